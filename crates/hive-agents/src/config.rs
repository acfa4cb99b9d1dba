//! Agent configuration — capabilities and behaviour.

use crate::behavior::BehaviorProfile;
use crate::team_agent::SEARCH_ROUTE_LEN;
use hive_core::error::{HiveError, Result};
use hive_core::types::Tick;
use serde::{Deserialize, Serialize};

/// Per-agent tunables.
///
/// The defaults describe a plain cooperative agent that carries one block
/// at a time and sees colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Blocks the agent can hold at once (default: 1). More than one
    /// lets it fetch the current and the next slot's block together.
    pub carry_capacity: usize,
    /// Match blocks on shape alone (default: false).
    pub colour_blind: bool,
    /// How faithfully the agent does its share (default: cooperative).
    pub profile: BehaviorProfile,
    /// Seed for the behaviour profile's random source (default: none).
    pub seed: Option<u64>,
    /// Where an orphaned block is set down, relative to its slot (default: one tile east).
    pub orphan_offset: (i32, i32),
    /// Last route waypoint visited when a search is cut short (default: 2).
    pub skip_after_waypoint: usize,
    /// Ticks an envelope id is remembered for duplicate detection; older
    /// envelopes are dropped unread (default: 32).
    pub dedupe_window: Tick,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            carry_capacity: 1,
            colour_blind: false,
            profile: BehaviorProfile::Cooperative,
            seed: None,
            orphan_offset: (1, 0),
            skip_after_waypoint: 2,
            dedupe_window: 32,
        }
    }
}

impl AgentConfig {
    /// An agent that can hold two blocks.
    pub fn strong() -> Self {
        Self {
            carry_capacity: 2,
            ..Self::default()
        }
    }

    /// An agent that cannot tell colours apart.
    pub fn colour_blind() -> Self {
        Self {
            colour_blind: true,
            ..Self::default()
        }
    }

    /// An agent that abandons trips and skips searches with `probability`.
    pub fn lazy(probability: f64) -> Self {
        Self {
            profile: BehaviorProfile::lazy(probability),
            ..Self::default()
        }
    }

    /// An agent that fabricates reports and abandons trips with `probability`.
    pub fn liar(probability: f64) -> Self {
        Self {
            profile: BehaviorProfile::liar(probability),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values the state machine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.carry_capacity == 0 {
            return Err(HiveError::invalid_config("carry_capacity", "must be at least 1"));
        }
        if self.dedupe_window == 0 {
            return Err(HiveError::invalid_config("dedupe_window", "must cover at least one tick"));
        }
        if self.skip_after_waypoint >= SEARCH_ROUTE_LEN {
            return Err(HiveError::invalid_config(
                "skip_after_waypoint",
                format!("must be below the {}-step search route", SEARCH_ROUTE_LEN),
            ));
        }
        for (field, p) in self.profile.probabilities() {
            if !(0.0..=1.0).contains(&p) {
                return Err(HiveError::invalid_config(
                    field,
                    format!("{} is not a probability", p),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for config in [
            AgentConfig::default(),
            AgentConfig::strong(),
            AgentConfig::colour_blind(),
            AgentConfig::lazy(0.3),
            AgentConfig::liar(0.3),
        ] {
            assert!(config.validate().is_ok(), "{:?}", config);
        }
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = AgentConfig {
            carry_capacity: 0,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_dedupe_window_rejected() {
        let config = AgentConfig {
            dedupe_window: 0,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn skip_waypoint_past_the_route_rejected() {
        let config = AgentConfig {
            skip_after_waypoint: usize::MAX,
            ..AgentConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("skip_after_waypoint"));
        let last = AgentConfig {
            skip_after_waypoint: SEARCH_ROUTE_LEN - 1,
            ..AgentConfig::default()
        };
        assert!(last.validate().is_ok());
    }

    #[test]
    fn out_of_range_probability_rejected() {
        let config = AgentConfig {
            profile: BehaviorProfile::Liar {
                lie_probability: 1.5,
                abandon_probability: 0.1,
            },
            ..AgentConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lie_probability"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: AgentConfig = toml::from_str(
            r#"
            colour_blind = true

            [profile]
            kind = "lazy"
            abandon_probability = 0.2
            skip_probability = 0.1
            "#,
        )
        .unwrap();
        assert!(config.colour_blind);
        assert_eq!(config.carry_capacity, 1);
        assert_eq!(config.profile.name(), "lazy");
    }
}
