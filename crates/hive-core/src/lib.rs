//! # Hive Core
//!
//! Core traits and types for decentralized block-delivery teams.
//!
//! A team of agents searches a building for goal blocks and delivers them,
//! in order, to a row of drop-off slots. There is no coordinator: every
//! agent keeps its own beliefs and learns about the others only through
//! gossip. This crate defines what the agents share:
//!
//! - **Types** - ids, grid locations, block descriptors, phases, actions
//! - **Model** - the agent-local records: rooms, drop-offs, goal-block beliefs, peers
//! - **Gossip** - the broadcast message taxonomy and its envelope
//! - **Trust** - the per-peer, per-category trust ledger and its store trait
//! - **World** - the navigator and perception collaborators agents consume
//! - **Agent** - the trait the scheduler drives once per tick
//!
//! ## Quick Start
//!
//! ```rust
//! use hive_core::prelude::*;
//!
//! let mut ledger = TrustLedger::new(AgentId::from("alice"), TrustPolicy::default());
//! let bob = AgentId::from("bob");
//! ledger.decrease(&bob, TrustCategory::FoundGoal);
//! assert!(ledger.score(&bob, TrustCategory::FoundGoal) < 0.5);
//! ```

pub mod types;
pub mod model;
pub mod world;
pub mod gossip;
pub mod trust;
pub mod agent;
pub mod error;
pub mod prelude;
