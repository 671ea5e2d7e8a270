use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::routes::Destination;
use super::users::{normalize_identifier, Role, UserRecord};
use super::verifier::authenticate;
use crate::error::PortalError;
use crate::storage::{load_json, save_json, Storage, SESSION_KEY};

/// What the login form hands to the gate
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub identifier: String,
    pub secret: String,
    /// Recorded in the session; no expiry policy reads it
    pub remember: bool,
}

/// "This device is signed in as `role`"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub identifier: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub remember: bool,
}

impl Session {
    pub fn new(identifier: String, role: Role, remember: bool) -> Self {
        Self {
            identifier,
            role,
            created_at: Utc::now(),
            remember,
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.created_at
    }

    pub fn is_expired(&self, lifetime: Option<Duration>) -> bool {
        match lifetime {
            Some(lifetime) => self.age() > lifetime,
            None => false,
        }
    }

    /// Part of the identifier before the '@'
    pub fn local_part(&self) -> &str {
        self.identifier.split('@').next().unwrap_or(&self.identifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Role),
}

/// Outcome of a page guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Admit(Session),
    Redirect(Destination),
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, GateDecision::Admit(_))
    }
}

/// Login, logout and page guards over the stored session.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    /// `None` means sessions never expire
    lifetime: Option<Duration>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifetime in hours; values of 0 or less mean no expiry
    pub fn with_lifetime_hours(hours: Option<i64>) -> Self {
        let lifetime = match hours {
            Some(h) if h > 0 => Some(Duration::hours(h)),
            Some(h) => {
                warn!(hours = h, "Session lifetime must be positive, sessions will not expire");
                None
            }
            None => None,
        };
        Self { lifetime }
    }

    /// Verify the form and, on success, store a new session and return the
    /// role's dashboard. Nothing is stored on failure.
    pub fn login(
        &self,
        storage: &mut dyn Storage,
        form: &LoginForm,
    ) -> Result<(Session, Destination), PortalError> {
        let record = authenticate(&form.identifier, &form.secret).ok_or_else(|| {
            info!("Login rejected");
            PortalError::InvalidCredentials
        })?;
        self.establish(storage, record, form)
    }

    /// Store the session for an already verified record and route it.
    /// Split from `login` so the check can run away from the input loop.
    pub fn establish(
        &self,
        storage: &mut dyn Storage,
        record: &UserRecord,
        form: &LoginForm,
    ) -> Result<(Session, Destination), PortalError> {
        let session = Session::new(
            normalize_identifier(&form.identifier),
            record.role,
            form.remember,
        );
        save_json(storage, SESSION_KEY, &session)?;

        let destination = Destination::for_role(session.role);
        info!(role = %session.role, view = destination.view_id(), "Login successful");
        Ok((session, destination))
    }

    /// Drop the stored session unconditionally
    pub fn logout(&self, storage: &mut dyn Storage) -> Destination {
        if let Err(e) = storage.remove(SESSION_KEY) {
            warn!(error = %e, "Failed to clear stored session");
        }
        info!("Logged out");
        Destination::Entry
    }

    /// The stored session, if present, parseable and not expired.
    /// Never writes to storage.
    pub fn current(&self, storage: &dyn Storage) -> Option<Session> {
        match load_json::<Session>(storage, SESSION_KEY) {
            Ok(Some(session)) if session.is_expired(self.lifetime) => {
                debug!(created_at = %session.created_at, "Stored session expired");
                None
            }
            Ok(session) => session,
            Err(e) => {
                debug!(error = %e, "Ignoring stored session");
                None
            }
        }
    }

    pub fn state(&self, storage: &dyn Storage) -> AuthState {
        match self.current(storage) {
            Some(session) => AuthState::Authenticated(session.role),
            None => AuthState::Anonymous,
        }
    }

    /// Page guard. Admits when a session exists and, if `allowed_roles` is
    /// non-empty, its role is listed. Otherwise redirects to the entry view.
    pub fn require_auth(&self, storage: &dyn Storage, allowed_roles: &[Role]) -> GateDecision {
        match self.current(storage) {
            Some(session) if allowed_roles.is_empty() || allowed_roles.contains(&session.role) => {
                GateDecision::Admit(session)
            }
            Some(session) => {
                debug!(role = %session.role, "Role not allowed on this view");
                GateDecision::Redirect(Destination::Entry)
            }
            None => GateDecision::Redirect(Destination::Entry),
        }
    }
}
