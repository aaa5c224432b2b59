//! # Spycat Agency Server
//!
//! The async half of Spycat: the HTTP API, the CLI, configuration and the
//! breed catalog. Every rule lives in `spycat-core`.

pub mod api;
pub mod breeds;
pub mod cli;
pub mod config;
