//! Gossip — typed belief updates broadcast between teammates.
//!
//! Delivery is at-least-once and ordered per sender. A message sent on tick
//! `t` is visible to receivers on tick `t + 1` at the earliest. Receivers
//! must tolerate duplicates, which is why every envelope carries an id.

use crate::trust::TrustCategory;
use crate::types::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a gossip envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// A belief update broadcast to the whole team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GossipMessage {
    /// The sender claimed this room and is walking to it.
    MovingToRoom { room: String },
    /// The sender is opening this room's door.
    OpeningDoor { room: String },
    /// The sender is searching this room.
    SearchingRoom { room: String },
    /// The sender reports a goal block at a location.
    FoundGoalBlock {
        block: BlockDescriptor,
        location: Location,
    },
    /// The sender is fetching (or has just grabbed) the block at a location.
    PickingUpGoalBlock {
        block: BlockDescriptor,
        location: Location,
    },
    /// The sender put a block down at a location.
    DroppedGoalBlock {
        block: BlockDescriptor,
        location: Location,
    },
    /// The sender caught `target` making a false claim in `category`.
    DecreaseTrust {
        target: AgentId,
        category: TrustCategory,
    },
}

impl GossipMessage {
    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            GossipMessage::MovingToRoom { .. } => "moving_to_room",
            GossipMessage::OpeningDoor { .. } => "opening_door",
            GossipMessage::SearchingRoom { .. } => "searching_room",
            GossipMessage::FoundGoalBlock { .. } => "found_goal_block",
            GossipMessage::PickingUpGoalBlock { .. } => "picking_up_goal_block",
            GossipMessage::DroppedGoalBlock { .. } => "dropped_goal_block",
            GossipMessage::DecreaseTrust { .. } => "decrease_trust",
        }
    }
}

/// A message in flight, stamped with its sender and send tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: MessageId,
    pub from: AgentId,
    pub sent_at: Tick,
    pub message: GossipMessage,
}

impl Envelope {
    pub fn new(from: AgentId, sent_at: Tick, message: GossipMessage) -> Self {
        Self {
            id: MessageId::new(),
            from,
            sent_at,
            message,
        }
    }

    /// Whether a receiver on tick `now` may see this envelope.
    pub fn visible_at(&self, now: Tick) -> bool {
        self.sent_at < now
    }
}
