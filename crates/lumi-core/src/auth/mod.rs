//! Authentication module: credential check, routing and session gate.
//!
//! This module provides:
//! - `USERS` / `find_user`: the built-in user table
//! - `verify` / `authenticate`: salted SHA-256 check of a candidate secret
//! - `SessionGate`: login, logout and per-view guards over the stored session
//! - `Destination`: the role-to-dashboard routing table
//!
//! Sessions are stored under the `session` key and never expire unless a
//! lifetime is configured.

pub mod routes;
pub mod session;
pub mod users;
pub mod verifier;

pub use routes::Destination;
pub use session::{AuthState, GateDecision, LoginForm, Session, SessionGate};
pub use users::{find_user, normalize_identifier, Role, UserRecord, USERS};
pub use verifier::{authenticate, generate_salt, hash_secret, verify};
