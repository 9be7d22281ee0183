//! gatekeep - user registration, login and token-protected endpoints
//!
//! This is the library interface for gatekeep. The binary wires these
//! modules into a CLI; tests and embedders can build the router directly.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::Database;
pub use error::Error;
