use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Portal profile. Serialized with the lowercase Portuguese names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Student
    Aluno,
    /// Teacher
    Professor,
    /// Parent or guardian
    Encarregado,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Aluno, Role::Professor, Role::Encarregado, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Aluno => "aluno",
            Role::Professor => "professor",
            Role::Encarregado => "encarregado",
            Role::Admin => "admin",
        }
    }

    /// Label for headers and the status bar
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Aluno => "Aluno",
            Role::Professor => "Professor",
            Role::Encarregado => "Encarregado de Educação",
            Role::Admin => "Administração",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// One row of the built-in user table.
///
/// `expected_digest` is `hex(sha256(salt_bytes || secret_utf8))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRecord {
    pub identifier: &'static str,
    pub role: Role,
    pub salt: &'static str,
    pub expected_digest: &'static str,
}

/// Demo accounts. Secrets: Aluno123!, Prof123!, EE123!, Admin123!
///
/// The salts and digests ship with the binary, so anyone holding it can
/// brute-force them offline. This check is not an authority.
pub static USERS: [UserRecord; 4] = [
    UserRecord {
        identifier: "aluno@escola.pt",
        role: Role::Aluno,
        salt: "6e8f899efc33940e5f4e1c14c60ae307",
        expected_digest: "ae5ce57f1b79551c8f4d507f79199d9a4993a4cccb3b3cf1733d428c210da1ad",
    },
    UserRecord {
        identifier: "professor@escola.pt",
        role: Role::Professor,
        salt: "2449634b15860c98598243be690c2d41",
        expected_digest: "0896a9f4c48c89aacebc18dc975ea38832c2e97b49be1f102547fcbf48b6311f",
    },
    UserRecord {
        identifier: "ee@escola.pt",
        role: Role::Encarregado,
        salt: "2e55cf3348ba6671660499f086e05121",
        expected_digest: "be37d38eaf0bf9c076056da56ca58da6b2b6ec5639e47b353d58cb8c3c2b77c1",
    },
    UserRecord {
        identifier: "admin@escola.pt",
        role: Role::Admin,
        salt: "8f1a50ff3ca9a264d1ec163d94137715",
        expected_digest: "be34b1df97d0845df4593e1dff221473944ec1b4fdfc094d26b5c4194d2c594a",
    },
];

/// Trim and lowercase an identifier as typed into the login form
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// Look up a user, ignoring case and surrounding whitespace
pub fn find_user(identifier: &str) -> Option<&'static UserRecord> {
    let normalized = normalize_identifier(identifier);
    USERS.iter().find(|u| u.identifier == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("aluno".parse::<Role>(), Ok(Role::Aluno));
        assert_eq!("professor".parse::<Role>(), Ok(Role::Professor));
        assert_eq!("encarregado".parse::<Role>(), Ok(Role::Encarregado));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        assert!("Admin".parse::<Role>().is_err());
        assert!("root".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_unknown_role_error() {
        let err = "root".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("root".to_string()));
        assert_eq!(err.to_string(), "unknown role 'root'");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Encarregado).unwrap(), "\"encarregado\"");
        let role: Role = serde_json::from_str("\"professor\"").unwrap();
        assert_eq!(role, Role::Professor);
        assert!(serde_json::from_str::<Role>("\"director\"").is_err());
    }

    #[test]
    fn test_find_user_normalizes() {
        assert_eq!(find_user("admin@escola.pt").map(|u| u.role), Some(Role::Admin));
        assert_eq!(find_user("  ADMIN@Escola.PT ").map(|u| u.role), Some(Role::Admin));
        assert!(find_user("nobody@escola.pt").is_none());
        assert!(find_user("").is_none());
    }

    #[test]
    fn test_table_has_one_user_per_role() {
        for role in Role::ALL {
            assert_eq!(USERS.iter().filter(|u| u.role == role).count(), 1, "{role}");
        }
    }
}
