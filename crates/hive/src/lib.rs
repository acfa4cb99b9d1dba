//! # Hive
//!
//! Decentralized coordination for a team of agents that search rooms for
//! coloured blocks and deliver them to a drop zone in a fixed order.
//!
//! There is no coordinator. Every agent keeps its own beliefs, hears its
//! teammates only through broadcast gossip, and settles conflicts by
//! re-running a rival's choice from the rival's position: whoever is
//! closer wins, the lower ordinal breaks ties. Gossip is weighed by a
//! per-peer trust ledger, so lazy or lying teammates lose influence.
//!
//! ## Quick Start
//!
//! ```rust
//! use hive::prelude::*;
//!
//! let config = TeamConfig::from_toml_str(r#"
//!     [[agents]]
//!     name = "alice"
//!
//!     [[agents]]
//!     name = "bob"
//!     carry_capacity = 2
//! "#).unwrap();
//!
//! let team = Team::from_config(&config).unwrap();
//! assert_eq!(team.roster().len(), 2);
//!
//! // Drive it with `team.run_until_complete(&mut world, 500)`, where
//! // `world` implements `Environment`.
//! ```
//!
//! ## Architecture
//!
//! - [`hive_core`] - Shared types, gossip messages, trust ledger, world traits
//! - [`hive_agents`] - The team agent: phases, claims, beliefs, behaviour profiles
//! - [`hive_runtime`] - Team scheduling, gossip bus, configuration, trust stores
//!
//! ## Phases
//!
//! | Phase | What the agent does |
//! |-------|---------------------|
//! | ChooseRoom | Claims the nearest unsearched room |
//! | GoToRoom | Walks to the room's entry tile |
//! | OpenDoor | Opens the door and announces the search |
//! | SearchRoom | Walks the room and notes goal blocks |
//! | ChooseGoal | Claims a reported block for an open slot |
//! | GrabGoal | Verifies the report and picks the block up |
//! | DropGoal | Delivers in slot order |
//!
//! ## Trust
//!
//! Each agent scores every teammate in three categories: drop-offs, room
//! searches and goal-block reports. Verified claims raise a score and
//! refuted claims lower it; a teammate whose score falls to the threshold
//! is no longer believed in that category. Ledgers can be persisted
//! between runs:
//!
//! ```rust,ignore
//! use hive::prelude::*;
//!
//! let mut store = JsonTrustStore::new("trust");
//! team.save_trust(&mut store)?;
//!
//! let mut next = Team::from_config(&config)?;
//! next.load_trust(&store)?;
//! ```

// Re-export all subcrates
pub use hive_core as core;
pub use hive_agents as agents;
pub use hive_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use hive::prelude::*;
/// ```
pub mod prelude {
    pub use hive_runtime::prelude::*;
}
