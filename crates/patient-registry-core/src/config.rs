//! Gateway configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the embedded database lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageLocation {
    /// Non-persistent store, discarded when the process exits.
    #[default]
    InMemory,
    /// SQLite file at the given path. The parent directory must exist.
    File { path: PathBuf },
}

/// Settings handed to the storage gateway at construction time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayConfig {
    pub storage: StorageLocation,
    /// How long the engine waits on a locked file before failing a statement.
    pub busy_timeout_ms: u64,
    /// Reject free-form statements that would modify the database.
    pub console_read_only: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            storage: StorageLocation::InMemory,
            busy_timeout_ms: 5_000,
            console_read_only: false,
        }
    }
}

impl GatewayConfig {
    /// In-memory store with default settings.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// File-backed store with default settings.
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            storage: StorageLocation::File { path: path.into() },
            ..Self::default()
        }
    }

    /// Parse a configuration document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
