//! Error types for Hive operations.
//!
//! The decision loop itself never fails: every combination of phase and
//! input yields an action. Errors only come from the edges of the system,
//! configuration loading and trust persistence.

use crate::types::AgentId;
use thiserror::Error;

/// Result type for Hive operations.
pub type Result<T> = std::result::Result<T, HiveError>;

/// Errors that can occur outside the decision loop.
#[derive(Debug, Error)]
pub enum HiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Trust store error: {0}")]
    Store(String),

    #[error("Trust ledger version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Agent not found: {0}")]
    UnknownAgent(AgentId),

    #[error("Duplicate agent: {0}")]
    DuplicateAgent(AgentId),
}

impl HiveError {
    /// Create an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        HiveError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a trust store error.
    pub fn store(msg: impl Into<String>) -> Self {
        HiveError::Store(msg.into())
    }
}
