//! # Campus
//!
//! HTTP service for persons and the courses they are enrolled in. The domain
//! rules live in `campus_core`; this crate adds configuration, SQLite
//! storage, the JSON transport and the server lifecycle.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod database;
pub mod http;
pub mod server;

pub use config::{load_config, Config, ConfigError, Overrides};
pub use database::Database;
pub use http::{router, AppState};
