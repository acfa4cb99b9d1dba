//! Hive Agents Prelude — convenient imports for common usage.
//!
//! ```rust
//! use hive_agents::prelude::*;
//! ```

pub use crate::team_agent::{TeamAgent, GoalTarget, CarriedBlock, search_route, SEARCH_ROUTE_LEN};
pub use crate::beliefs::Beliefs;
pub use crate::claim::{contest, outranks, Candidate, GoalSelection, RoomSelection, Selection, Vantage, Verdict};
pub use crate::config::AgentConfig;
pub use crate::behavior::{BehaviorProfile, Temperament};

pub use hive_core::prelude::*;
