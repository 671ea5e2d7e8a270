//! Lumi core - the logic behind the school portal demo.
//!
//! - `auth`: user table, salted SHA-256 credential check, session gate, routing
//! - `storage`: the key/value store everything is persisted in
//! - `dashboard`: tabs, theme, exercise, chat and report state
//! - `config`: on-disk configuration
//!
//! Nothing here is a security boundary: the user table ships with the code.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::{PortalError, StorageError};
