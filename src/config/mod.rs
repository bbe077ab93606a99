// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Vault

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the vault root directory
pub const VAULT_PATH_ENV: &str = "VAULT_PATH";

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Root directory of the vault
    #[serde(default = "default_vault_path")]
    pub vault_path: String,

    /// Analyzer-specific settings
    #[serde(default)]
    pub analyzers: AnalyzerConfig,

    /// Health service settings
    #[serde(default)]
    pub web: WebConfig,

    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub pdf: ReaderConfig,
    #[serde(default)]
    pub docx: ReaderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReaderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Database file, relative to the vault root unless absolute
    #[serde(default = "default_db_path")]
    pub path: String,
}

// Default value functions
fn default_vault_path() -> String { "/media/amy/EXTERNAL/Vault_Master_Data".to_string() }
fn default_true() -> bool { true }
fn default_web_host() -> String { "127.0.0.1".to_string() }
fn default_web_port() -> u16 { 8080 }
fn default_db_path() -> String { "_System/data/vault.db".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
            analyzers: AnalyzerConfig::default(),
            web: WebConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::VaultError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply the `VAULT_PATH` environment override
    pub fn apply_env(&mut self) {
        self.apply_vault_override(std::env::var(VAULT_PATH_ENV).ok());
    }

    fn apply_vault_override(&mut self, value: Option<String>) {
        if let Some(path) = value.filter(|p| !p.trim().is_empty()) {
            tracing::debug!("Vault path overridden by {}: {}", VAULT_PATH_ENV, path);
            self.vault_path = path;
        }
    }

    /// Root directory of the vault
    pub fn vault_root(&self) -> PathBuf {
        PathBuf::from(&self.vault_path)
    }

    /// Resolved location of the catalog database
    pub fn database_path(&self) -> PathBuf {
        self.vault_root().join(&self.database.path)
    }
}
