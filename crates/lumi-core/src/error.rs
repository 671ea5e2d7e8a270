use thiserror::Error;

/// User-visible text for a failed login. Never says which half was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Credenciais inválidas.";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("Stored value under '{key}' could not be parsed: {reason}")]
    MalformedStoredState { key: String, reason: String },

    #[error("View element not present: {0}")]
    MissingElement(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Maximum length for a stored value echoed into a log line
const MAX_LOGGED_VALUE_LENGTH: usize = 80;

impl PortalError {
    /// Build a `MalformedStoredState` from a parse failure, truncating the raw
    /// value so a corrupted chat history does not flood the log.
    pub fn malformed(key: &str, raw: &str, err: impl std::fmt::Display) -> Self {
        let preview = if raw.len() <= MAX_LOGGED_VALUE_LENGTH {
            raw.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                crate::utils::format::truncate_chars(raw, MAX_LOGGED_VALUE_LENGTH),
                raw.len()
            )
        };
        PortalError::MalformedStoredState {
            key: key.to_string(),
            reason: format!("{} in {:?}", err, preview),
        }
    }

    /// Message suitable for the login form / status bar.
    pub fn user_message(&self) -> String {
        match self {
            PortalError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            PortalError::Storage(_) => "Não foi possível guardar os dados locais.".to_string(),
            other => other.to_string(),
        }
    }
}
