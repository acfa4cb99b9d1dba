//! Agent-local world records.
//!
//! Every agent owns its own copy of these records. They are beliefs, not
//! ground truth: they change through direct observation or through gossip
//! from teammates, and they may be stale or wrong.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// A room in the building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    /// The tile just inside the door, where a search starts.
    pub entry: Location,
    /// Handle of the room's door.
    pub door: ObjectId,
    /// Someone on the team has claimed or searched this room.
    pub visited: bool,
    /// This agent has claimed or searched this room.
    pub visited_by_me: bool,
    /// The agent that most recently claimed a search of this room.
    pub last_searcher: Option<AgentId>,
}

impl Room {
    /// A room whose search starts one tile south of its door.
    pub fn new(name: impl Into<String>, door: ObjectId, door_location: Location) -> Self {
        Self {
            name: name.into(),
            entry: door_location.offset(0, 1),
            door,
            visited: false,
            visited_by_me: false,
            last_searcher: None,
        }
    }
}

/// An ordered delivery slot.
///
/// Slot `i` can only be delivered after slot `i - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropOff {
    /// Delivery rank, starting at 0.
    pub index: usize,
    pub block: BlockDescriptor,
    pub location: Location,
    pub delivered: bool,
    /// Someone on the team is fetching a block for this slot.
    pub grabbed: bool,
}

impl DropOff {
    pub fn new(index: usize, block: BlockDescriptor, location: Location) -> Self {
        Self {
            index,
            block,
            location,
            delivered: false,
            grabbed: false,
        }
    }

    /// Still needs a block and nobody is fetching one.
    pub fn is_open(&self) -> bool {
        !self.delivered && !self.grabbed
    }
}

/// Where a goal-block belief came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Seen by this agent.
    Observed,
    /// Reported by a teammate.
    Gossiped(AgentId),
}

impl Provenance {
    /// The teammate to credit or blame for this belief, if any.
    pub fn originator(&self) -> Option<&AgentId> {
        match self {
            Provenance::Observed => None,
            Provenance::Gossiped(peer) => Some(peer),
        }
    }
}

/// A belief that a goal block lies at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundGoalBlock {
    pub block: BlockDescriptor,
    pub location: Location,
    pub provenance: Provenance,
}

impl FoundGoalBlock {
    pub fn observed(block: BlockDescriptor, location: Location) -> Self {
        Self {
            block,
            location,
            provenance: Provenance::Observed,
        }
    }

    pub fn gossiped(block: BlockDescriptor, location: Location, from: AgentId) -> Self {
        Self {
            block,
            location,
            provenance: Provenance::Gossiped(from),
        }
    }

    /// Same colour, shape and location.
    pub fn describes_same_block(&self, block: &BlockDescriptor, location: Location) -> bool {
        self.location == location
            && self.block.colour == block.colour
            && self.block.shape == block.shape
    }
}

/// What this agent last heard about a teammate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerStatus {
    pub id: AgentId,
    /// Position in the team roster; lower ordinals win claim ties.
    pub ordinal: usize,
    /// `None` while the peer is out of sensor range.
    pub location: Option<Location>,
    pub phase: Phase,
}

impl PeerStatus {
    pub fn new(id: AgentId, ordinal: usize) -> Self {
        Self {
            id,
            ordinal,
            location: None,
            phase: Phase::ChooseRoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_entry_is_south_of_door() {
        let room = Room::new("room_1", ObjectId::new("door_1"), Location::new(4, 2));
        assert_eq!(room.entry, Location::new(4, 3));
        assert!(!room.visited);
        assert!(room.last_searcher.is_none());
    }

    #[test]
    fn provenance_originator() {
        let peer = AgentId::from("bob");
        assert_eq!(Provenance::Observed.originator(), None);
        assert_eq!(Provenance::Gossiped(peer.clone()).originator(), Some(&peer));
    }

    #[test]
    fn same_block_ignores_size_and_provenance() {
        let belief = FoundGoalBlock::observed(BlockDescriptor::new("#fff", 1, 0.5), Location::new(1, 1));
        assert!(belief.describes_same_block(&BlockDescriptor::new("#fff", 1, 1.0), Location::new(1, 1)));
        assert!(!belief.describes_same_block(&BlockDescriptor::new("#fff", 1, 0.5), Location::new(1, 2)));
    }
}
