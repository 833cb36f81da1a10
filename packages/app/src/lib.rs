//! EntaGen client core - host glue around the authentication flow.
//!
//! The interesting control flow lives in the `auth-flow` crate; this crate
//! supplies what a running client needs around it:
//!
//! - [`Config`] - environment-driven configuration
//! - [`FileStorage`] - durable key/value backend for the session store
//! - [`AppShell`] - the host surface (user id, verification flag, logout,
//!   document-analysis reporting) plus the session's document history
//! - [`DemoAuthApi`] - in-memory stand-in for the EntaGen backend
//! - [`DocumentRecord`] / [`DocumentStatus`] - analyzed-document records in
//!   the backend's wire shape

pub mod config;
pub mod demo;
pub mod documents;
pub mod shell;
pub mod storage;

pub use config::Config;
pub use demo::{DemoAuthApi, DEMO_PASSCODE};
pub use documents::{DocumentRecord, DocumentStatus};
pub use shell::AppShell;
pub use storage::FileStorage;
