// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # squid-observability
//!
//! Logging infrastructure shared by the squid crates, with per-crate debug
//! flag support.
//!
//! ## Features
//! - `file-logging`: JSON log files in timestamped run folders

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Crate names accepted by `--debug-{crate-name}`
pub const KNOWN_CRATES: &[&str] = &["squid", "squid-neural", "squid-config", "squid-observability"];
