//! Team configuration — loaded from TOML or JSON.
//!
//! ```toml
//! [bus]
//! redeliver = false
//!
//! [trust.found_goal]
//! initial = 0.5
//! decrement = 0.25
//! increment = 0.1
//! threshold = 0.0
//!
//! [[agents]]
//! name = "alice"
//!
//! [[agents]]
//! name = "bob"
//! carry_capacity = 2
//! ```

use crate::bus::BusConfig;
use hive_agents::config::AgentConfig;
use hive_core::error::{HiveError, Result};
use hive_core::trust::TrustPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One team member: its name plus its capability and behaviour settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    #[serde(flatten)]
    pub config: AgentConfig,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, config: AgentConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Everything needed to assemble a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    /// Trust constants shared by every member.
    pub trust: TrustPolicy,
    pub bus: BusConfig,
    /// Members in ordinal order.
    pub agents: Vec<AgentSpec>,
}

impl TeamConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, picking the format by extension (`.json`, else TOML).
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// Reject duplicate names, empty names and invalid agent settings.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for spec in &self.agents {
            if spec.name.trim().is_empty() {
                return Err(HiveError::invalid_config("agents.name", "must not be empty"));
            }
            if !names.insert(spec.name.as_str()) {
                return Err(HiveError::DuplicateAgent(spec.name.as_str().into()));
            }
            spec.config.validate()?;
        }
        for category in hive_core::trust::TrustCategory::ALL {
            let policy = self.trust.category(category);
            if policy.decrement < 0.0 || policy.increment < 0.0 {
                return Err(HiveError::invalid_config(
                    format!("trust.{}", category),
                    "increments and decrements must be non-negative",
                ));
            }
        }
        Ok(())
    }
}
