//! World — the collaborators an agent consumes but does not implement.
//!
//! Path-finding, sensing and door mechanics belong to whatever world the
//! team runs in. Agents see it only through these narrow traits, which
//! keeps the coordination logic testable against scripted fakes.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Result of asking the navigator for the next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStep {
    /// Take this step to get closer.
    Move(Direction),
    /// Already standing on the target tile.
    Arrived,
}

/// Path-finding over the world grid.
pub trait Navigator {
    /// The next atomic move from `from` towards `to`.
    fn next_step(&self, from: Location, to: Location) -> NavStep;

    /// Number of moves between two tiles, `None` when unreachable.
    fn path_length(&self, from: Location, to: Location) -> Option<u32>;
}

/// A collectable object the agent can currently see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensedObject {
    pub id: ObjectId,
    pub location: Location,
    pub block: BlockDescriptor,
}

/// Static layout of a room, as surveyed at start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub name: String,
    pub door: ObjectId,
    pub door_location: Location,
}

/// A delivery slot, as surveyed at start-up. Listed in delivery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropZoneSlot {
    pub block: BlockDescriptor,
    pub location: Location,
}

/// Everything an agent learns about the world before its first decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSurvey {
    pub rooms: Vec<RoomLayout>,
    pub drop_zone: Vec<DropZoneSlot>,
    /// The whole team, including the surveying agent, in ordinal order.
    pub team: Vec<AgentId>,
}

/// Local sensing around the agent.
pub trait Perception {
    /// The agent's own tile.
    fn location(&self) -> Location;

    /// Visible collectables accepted by `predicate`.
    fn sense(&self, predicate: &dyn Fn(&SensedObject) -> bool) -> Vec<SensedObject>;

    /// Where a teammate stands, `None` when out of sensor range.
    fn peer_location(&self, peer: &AgentId) -> Option<Location>;

    /// Static world layout. Read once, on the agent's first tick.
    fn survey(&self) -> WorldSurvey;
}

/// Combined view handed to an agent each tick.
pub trait WorldView: Navigator + Perception {}

impl<T: Navigator + Perception> WorldView for T {}
