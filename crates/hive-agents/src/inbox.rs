//! Gossip ingestion — folding teammates' messages into local beliefs.
//!
//! Every claim a message makes is checked against the sender's trust in
//! the matching category before it is believed. Phase updates are always
//! applied; they only say what the sender is doing.

use crate::beliefs::{Beliefs, PendingPickup};
use hive_core::gossip::{Envelope, GossipMessage};
use hive_core::model::FoundGoalBlock;
use hive_core::trust::{TrustCategory, TrustLedger};
use hive_core::types::*;
use tracing::{debug, trace};

impl Beliefs {
    /// Apply one envelope from a teammate.
    ///
    /// Envelopes sent by the ledger's owner are ignored.
    pub fn absorb(&mut self, ledger: &mut TrustLedger, envelope: &Envelope) {
        let sender = &envelope.from;
        if sender == ledger.owner() {
            return;
        }
        ledger.meet(sender);
        trace!(
            agent = %ledger.owner(),
            from = %sender,
            kind = envelope.message.kind(),
            "absorbing gossip"
        );

        match &envelope.message {
            GossipMessage::MovingToRoom { room } => {
                self.set_peer_phase(sender, Phase::GoToRoom);
                if ledger.is_trusted(sender, TrustCategory::RoomSearch) {
                    self.claim_room(room, sender, false);
                } else {
                    debug!(agent = %ledger.owner(), from = %sender, room = %room, "ignoring room claim from untrusted peer");
                }
            }
            GossipMessage::OpeningDoor { .. } => {
                self.set_peer_phase(sender, Phase::OpenDoor);
            }
            GossipMessage::SearchingRoom { .. } => {
                self.set_peer_phase(sender, Phase::SearchRoom);
            }
            GossipMessage::FoundGoalBlock { block, location } => {
                self.set_peer_phase(sender, Phase::ChooseGoal);
                self.record_report(sender, *location);
                if ledger.is_trusted(sender, TrustCategory::FoundGoal) {
                    self.add_found(FoundGoalBlock::gossiped(block.clone(), *location, sender.clone()));
                } else {
                    debug!(agent = %ledger.owner(), from = %sender, %location, "ignoring goal report from untrusted peer");
                }
            }
            GossipMessage::PickingUpGoalBlock { block, location } => {
                self.set_peer_phase(sender, Phase::GrabGoal);
                self.remove_found(block, *location);
                if !ledger.is_trusted(sender, TrustCategory::DropOff) {
                    return;
                }
                let repeat = self
                    .pending_pickups
                    .get(sender)
                    .map(|p| p.location == *location)
                    .unwrap_or(false);
                if repeat {
                    return;
                }
                let slot = self
                    .open_slots()
                    .find(|d| d.block.matches(block, false))
                    .map(|d| d.index);
                if let Some(index) = slot {
                    self.mark_grabbed(index, false);
                }
                self.pending_pickups.insert(
                    sender.clone(),
                    PendingPickup {
                        location: *location,
                        slot,
                    },
                );
            }
            GossipMessage::DroppedGoalBlock { block, location } => {
                self.set_peer_phase(sender, Phase::ChooseGoal);
                let pending = self.pending_pickups.remove(sender);
                match self.slot_at(*location) {
                    Some(index) => {
                        if ledger.is_trusted(sender, TrustCategory::DropOff) {
                            self.mark_delivered(index);
                            ledger.increase(sender, TrustCategory::DropOff);
                        } else {
                            debug!(agent = %ledger.owner(), from = %sender, slot = index, "ignoring delivery from untrusted peer");
                        }
                    }
                    None => {
                        self.add_found(FoundGoalBlock::gossiped(block.clone(), *location, sender.clone()));
                        ledger.decrease(sender, TrustCategory::DropOff);
                        self.release_pending(pending);
                    }
                }
            }
            GossipMessage::DecreaseTrust { target, category } => {
                if ledger.accepts_accusations_from(sender) {
                    ledger.decrease(target, *category);
                } else {
                    debug!(agent = %ledger.owner(), from = %sender, target = %target, "ignoring accusation from distrusted peer");
                }
            }
        }
    }

    /// Free the slot a teammate was fetching for after it dropped its block elsewhere.
    fn release_pending(&mut self, pending: Option<PendingPickup>) {
        let index = match pending.and_then(|p| p.slot) {
            Some(index) => Some(index),
            None => self
                .drop_offs()
                .iter()
                .find(|d| d.grabbed && !d.delivered && !self.held_slots().contains(&d.index))
                .map(|d| d.index),
        };
        if let Some(index) = index {
            let still_pending = self
                .drop_off(index)
                .map(|d| d.grabbed && !d.delivered)
                .unwrap_or(false);
            if still_pending && !self.held_slots().contains(&index) {
                self.release(index);
            }
        }
    }
}
