use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::users::{find_user, UserRecord};

/// Salt length in bytes for newly generated table entries
const SALT_LEN: usize = 16;

/// `hex(sha256(salt_bytes || secret_utf8))`
pub fn hash_secret(salt_hex: &str, secret: &str) -> Result<String, hex::FromHexError> {
    let salt = hex::decode(salt_hex)?;
    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(secret.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Fresh random salt, hex-encoded
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Check a candidate secret against a known record
pub fn matches(record: &UserRecord, candidate_secret: &str) -> bool {
    let computed = match hash_secret(record.salt, candidate_secret) {
        Ok(digest) => digest,
        Err(e) => {
            warn!(identifier = record.identifier, error = %e, "Salt in user table is not valid hex");
            return false;
        }
    };
    computed
        .as_bytes()
        .ct_eq(record.expected_digest.as_bytes())
        .into()
}

/// Resolve an identifier/secret pair to its user record.
///
/// Unknown identifiers and wrong secrets both come back as `None`.
pub fn authenticate(identifier: &str, candidate_secret: &str) -> Option<&'static UserRecord> {
    let record = find_user(identifier);
    let accepted = record.filter(|r| matches(r, candidate_secret));
    debug!(known = record.is_some(), accepted = accepted.is_some(), "Credential check");
    accepted
}

pub fn verify(identifier: &str, candidate_secret: &str) -> bool {
    authenticate(identifier, candidate_secret).is_some()
}
