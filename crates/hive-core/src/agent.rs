//! Agent — one autonomous team member.
//!
//! An agent owns all of its beliefs. Once per tick the scheduler hands it
//! the gossip that became visible since the last tick and a view of the
//! world; the agent answers with one action and any gossip it wants to
//! broadcast. Nothing else crosses the agent boundary.

use crate::gossip::{Envelope, GossipMessage};
use crate::model::DropOff;
use crate::trust::TrustLedger;
use crate::types::*;
use crate::world::WorldView;

/// What an agent decided on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: AgentAction,
    /// Messages to broadcast, in send order.
    pub outbox: Vec<GossipMessage>,
}

impl Decision {
    pub fn idle() -> Self {
        Self {
            action: AgentAction::Idle,
            outbox: Vec::new(),
        }
    }
}

/// A team member driven by an external scheduler.
pub trait Agent {
    /// The agent's identity.
    fn id(&self) -> &AgentId;

    /// The phase the agent is currently in.
    fn phase(&self) -> Phase;

    /// Execute one decision step.
    ///
    /// `inbox` holds envelopes from teammates that became visible on
    /// `tick`. Duplicates and the agent's own envelopes may appear and must
    /// be ignored.
    fn decide(&mut self, tick: Tick, view: &dyn WorldView, inbox: &[Envelope]) -> Decision;

    /// The agent's belief about the delivery slots, in rank order.
    fn drop_offs(&self) -> &[DropOff];

    /// The agent's trust in its teammates.
    fn ledger(&self) -> &TrustLedger;

    /// Mutable access for restoring persisted trust.
    fn ledger_mut(&mut self) -> &mut TrustLedger;

    /// Whether this agent believes every slot has been delivered.
    ///
    /// False before the agent has surveyed the world.
    fn believes_complete(&self) -> bool {
        let slots = self.drop_offs();
        !slots.is_empty() && slots.iter().all(|d| d.delivered)
    }
}
