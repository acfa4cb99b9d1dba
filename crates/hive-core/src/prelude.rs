//! Hive Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use hive_core::prelude::*;
//! ```

pub use crate::types::{
    AgentId, ObjectId, Location, Direction,
    Colour, Shape, BlockDescriptor,
    Phase, AgentAction, Tick,
};

pub use crate::model::{Room, DropOff, FoundGoalBlock, Provenance, PeerStatus};

pub use crate::world::{
    Navigator, NavStep, Perception, WorldView,
    SensedObject, WorldSurvey, RoomLayout, DropZoneSlot,
};

pub use crate::gossip::{Envelope, GossipMessage, MessageId};

pub use crate::trust::{
    TrustCategory, TrustPolicy, CategoryPolicy, CategoryScores,
    TrustLedger, TrustRecord, TrustChange, TrustStore,
};

pub use crate::agent::{Agent, Decision};

pub use crate::error::{HiveError, Result};
