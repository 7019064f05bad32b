//! Configuration structures for the reporting application.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CaniveteError, Result};

/// Main configuration for the canivete application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Access directory configuration.
    pub directory: DirectoryConfig,

    /// Session cookie parameters consumed by the web front end.
    pub cookie: CookieConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            directory: DirectoryConfig::default(),
            cookie: CookieConfig::default(),
        }
    }
}

/// Report store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per client.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dados_clientes"),
        }
    }
}

/// Access directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Path to the credentials file.
    pub users_file: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            users_file: PathBuf::from("users.json"),
        }
    }
}

/// Session cookie parameters.
///
/// The core pipeline never reads these; they are persisted alongside the
/// credentials so the web collaborator has a single source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Cookie name.
    pub name: String,

    /// Cookie signing key.
    pub key: String,

    /// Cookie expiry in days.
    pub expiry_days: u32,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "canivete_cookie".to_string(),
            key: "chave_secreta_longa_2025".to_string(),
            expiry_days: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| CaniveteError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CaniveteError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
