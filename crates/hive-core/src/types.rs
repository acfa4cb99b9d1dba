//! Shared types used across all Hive crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic tick counter driven by the external scheduler.
pub type Tick = u64;

/// Identity of a team member.
///
/// Agent ids are the names the world assigns to team members, so they are
/// plain strings rather than generated uuids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for AgentId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identity of a world object (door handle, collectable block).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tile on the world grid. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The tile displaced by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Grid distance ignoring obstacles.
    pub fn manhattan(&self, other: &Location) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single atomic move on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// The `(dx, dy)` displacement of one step in this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Block colour as the world reports it (e.g. `"#0008ff"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour(pub String);

impl Colour {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block shape code as the world reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape(pub u8);

/// Visual attributes of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub colour: Colour,
    pub shape: Shape,
    pub size: f64,
}

impl BlockDescriptor {
    pub fn new(colour: impl Into<String>, shape: u8, size: f64) -> Self {
        Self {
            colour: Colour::new(colour),
            shape: Shape(shape),
            size,
        }
    }

    /// Whether `other` satisfies this descriptor.
    ///
    /// Size is never compared. A colour-blind observer only compares shapes.
    pub fn matches(&self, other: &BlockDescriptor, colour_blind: bool) -> bool {
        self.shape == other.shape && (colour_blind || self.colour == other.colour)
    }
}

/// The phases of an agent's decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    ChooseRoom,
    GoToRoom,
    OpenDoor,
    SearchRoom,
    ChooseGoal,
    GrabGoal,
    DropGoal,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::ChooseRoom => "choose_room",
            Phase::GoToRoom => "go_to_room",
            Phase::OpenDoor => "open_door",
            Phase::SearchRoom => "search_room",
            Phase::ChooseGoal => "choose_goal",
            Phase::GrabGoal => "grab_goal",
            Phase::DropGoal => "drop_goal",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action an agent requests from the world for this tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentAction {
    /// Do nothing this tick. Used for lost claims and ordering waits;
    /// the agent simply retries on the next tick.
    Idle,
    /// Take one step.
    Move(Direction),
    /// Open the door with this handle.
    OpenDoor(ObjectId),
    /// Pick up this object.
    Grab(ObjectId),
    /// Put down a carried object (the most recently grabbed one when `None`).
    Drop(Option<ObjectId>),
}

impl AgentAction {
    pub fn is_idle(&self) -> bool {
        matches!(self, AgentAction::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_blind_matching_ignores_colour() {
        let wanted = BlockDescriptor::new("#0008ff", 1, 0.5);
        let seen = BlockDescriptor::new("#ff1500", 1, 0.5);
        assert!(!wanted.matches(&seen, false));
        assert!(wanted.matches(&seen, true));
    }

    #[test]
    fn size_does_not_affect_matching() {
        let wanted = BlockDescriptor::new("#0008ff", 2, 0.5);
        let seen = BlockDescriptor::new("#0008ff", 2, 1.0);
        assert!(wanted.matches(&seen, false));
    }

    #[test]
    fn offset_and_distance() {
        let a = Location::new(3, 4);
        assert_eq!(a.offset(0, 1), Location::new(3, 5));
        assert_eq!(a.manhattan(&Location::new(0, 0)), 7);
    }
}
