//! # Hive Agents
//!
//! The decision core of a Hive team member.
//!
//! - **TeamAgent** - the phase state machine (choose room, go to room, open
//!   door, search room, choose goal, grab goal, drop goal)
//! - **Beliefs** - the agent's private world model and gossip ingestion
//! - **Claim resolution** - deterministic priority for contested rooms and blocks
//! - **Behaviour profiles** - lazy and lying variants of the same machine
//!
//! Agents never share memory. All coordination happens through the
//! [`GossipMessage`](hive_core::gossip::GossipMessage)s they return from
//! [`Agent::decide`](hive_core::agent::Agent::decide).

pub mod behavior;
pub mod beliefs;
pub mod claim;
pub mod config;
pub mod team_agent;
pub mod prelude;

mod delivery;
mod inbox;
mod search;
