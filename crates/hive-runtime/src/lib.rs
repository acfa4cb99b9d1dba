//! # Hive Runtime
//!
//! Team scheduling and host plumbing.
//!
//! The runtime owns everything that sits between agents: the tick loop,
//! the gossip bus, team configuration and trust persistence. The world
//! itself is supplied by the host through [`team::Environment`].

pub mod bus;
pub mod config;
pub mod prelude;
pub mod team;
pub mod telemetry;
pub mod trust_store;

#[cfg(feature = "sqlite")]
pub mod sqlite_trust;
