//! Hive Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use hive_runtime::prelude::*;
//! ```

pub use crate::bus::{BusConfig, GossipBus};
pub use crate::config::{AgentSpec, TeamConfig};
pub use crate::team::{Environment, Team, TeamEvent, TeamStats};
pub use crate::telemetry::{init_tracing, init_tracing_with};
pub use crate::trust_store::{JsonTrustStore, LedgerFile, MemoryTrustStore, LEDGER_VERSION};

#[cfg(feature = "sqlite")]
pub use crate::sqlite_trust::SqliteTrustStore;

pub use hive_agents::prelude::*;
