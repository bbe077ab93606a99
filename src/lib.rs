// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Vault: interactive file cataloging
//!
//! Analyzes a file on disk, suggests metadata, asks the user to confirm or
//! override each field, and records the result in a local SQLite catalog.
//! Version 2.0 - pluggable document readers and a health-check service.

pub mod analyzers;
pub mod config;
pub mod db;
pub mod error;
pub mod index;
pub mod search;
pub mod web;
pub mod workflow;

pub use config::AppConfig;
pub use error::{Result, VaultError};
