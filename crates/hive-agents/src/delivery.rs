//! Goal phases: choosing, fetching and delivering goal blocks.
//!
//! Fetched blocks are verified on arrival. A missing block costs its
//! reporter found-goal trust, announced to the team; a different block than
//! reported costs the same trust locally and is re-reported as our own
//! find. Blocks are only put down on their slot once the previous slot has
//! been delivered.

use crate::claim::{contest, GoalSelection, Verdict};
use crate::team_agent::{CarriedBlock, GoalTarget, Step, TeamAgent};
use hive_core::gossip::GossipMessage;
use hive_core::model::FoundGoalBlock;
use hive_core::trust::TrustCategory;
use hive_core::types::*;
use hive_core::world::{NavStep, WorldView};
use tracing::{debug, info, trace, warn};

impl TeamAgent {
    /// Slots this agent may fetch for right now.
    ///
    /// Only the first open slot, unless this agent already holds or is
    /// walking to the block for the earliest undelivered slot; then a
    /// multi-carry agent may also fetch the one after it.
    fn target_slots(&self) -> Vec<usize> {
        let room_in_hands = self.config.carry_capacity.saturating_sub(self.carried.len());
        let lookahead = if self.config.carry_capacity > 1 && self.holds_current_slot() { 2 } else { 1 };
        self.beliefs
            .open_slots()
            .take(lookahead.min(room_in_hands))
            .map(|d| d.index)
            .collect()
    }

    fn holds_current_slot(&self) -> bool {
        let current = match self.beliefs.outstanding_slots().next() {
            Some(slot) => slot.index,
            None => return false,
        };
        self.carried.iter().any(|c| c.slot == current)
            || self.goal.as_ref().is_some_and(|g| g.slot == current)
    }

    /// Whether the slot before our front block is neither delivered nor being fetched.
    fn predecessor_unclaimed(&self) -> bool {
        let front = match self.carried.first() {
            Some(front) => front.slot,
            None => return false,
        };
        if self.beliefs.ready_for_delivery(front) {
            return false;
        }
        self.beliefs
            .drop_off(front - 1)
            .is_some_and(|d| !d.delivered && !d.grabbed)
    }

    /// Leave the goal phases: deliver what we hold, or go back to searching.
    ///
    /// Holding a block whose predecessor nobody is fetching, we keep
    /// searching while rooms we have not searched remain.
    fn nothing_to_fetch(&mut self) -> Step {
        let unsearched = self.beliefs.rooms().iter().any(|r| !r.visited_by_me);
        if self.carried.is_empty() || (self.predecessor_unclaimed() && unsearched) {
            self.enter(Phase::ChooseRoom);
        } else {
            self.enter(Phase::DropGoal);
        }
        Step::Continue
    }

    pub(crate) fn choose_goal(&mut self, view: &dyn WorldView) -> Step {
        let slots = self.target_slots();
        if slots.is_empty() {
            return self.nothing_to_fetch();
        }

        let me = self.vantage(view.location());
        let rivals = self.rivals(Phase::ChooseGoal, TrustCategory::DropOff);
        let (verdict, target) = {
            let selection = GoalSelection {
                beliefs: &self.beliefs,
                navigator: view,
                ledger: &self.ledger,
                slots: &slots,
                colour_blind: self.config.colour_blind,
            };
            let verdict = contest(&selection, &me, &rivals);
            let target = match &verdict {
                Verdict::Won(candidate) => self
                    .beliefs
                    .found()
                    .iter()
                    .find(|b| b.location == candidate.resource && selection.slot_for(&b.block).is_some())
                    .and_then(|b| {
                        selection.slot_for(&b.block).map(|slot| GoalTarget {
                            block: b.block.clone(),
                            location: b.location,
                            slot,
                            provenance: b.provenance.clone(),
                        })
                    }),
                _ => None,
            };
            (verdict, target)
        };

        match verdict {
            Verdict::Vacant => self.nothing_to_fetch(),
            Verdict::Yielded { candidate, to } => {
                trace!(agent = %self.id, location = %candidate.resource, rival = %to, "goal claim lost");
                Step::Act(AgentAction::Idle)
            }
            Verdict::Won(_) => {
                let target = match target {
                    Some(target) => target,
                    None => return self.nothing_to_fetch(),
                };
                debug!(agent = %self.id, location = %target.location, slot = target.slot, "goal claimed");
                self.beliefs.mark_grabbed(target.slot, true);
                self.broadcast(GossipMessage::PickingUpGoalBlock {
                    block: target.block.clone(),
                    location: target.location,
                });
                self.goal = Some(target);
                self.enter(Phase::GrabGoal);
                Step::Continue
            }
        }
    }

    /// Give up on the current target and free its slot.
    fn drop_target(&mut self, target: &GoalTarget) {
        self.beliefs.remove_found(&target.block, target.location);
        self.beliefs.release(target.slot);
        self.goal = None;
        self.enter(Phase::ChooseGoal);
    }

    pub(crate) fn grab_goal(&mut self, view: &dyn WorldView) -> Step {
        let target = match self.goal.clone() {
            Some(target) => target,
            None => {
                self.enter(Phase::ChooseGoal);
                return Step::Continue;
            }
        };

        if self.beliefs.belief(&target.block, target.location).is_none() {
            debug!(agent = %self.id, location = %target.location, "goal taken by a teammate");
            self.drop_target(&target);
            return Step::Continue;
        }

        let here = view.location();
        if let NavStep::Move(direction) = view.next_step(here, target.location) {
            return Step::Act(AgentAction::Move(direction));
        }

        let colour_blind = self.config.colour_blind;
        let present = view.sense(&|o| o.location == target.location);
        let originator = target.provenance.originator().cloned();

        if present.is_empty() {
            warn!(agent = %self.id, location = %target.location, originator = ?originator, "reported goal block is absent");
            if let Some(peer) = originator {
                self.ledger.decrease(&peer, TrustCategory::FoundGoal);
                self.broadcast(GossipMessage::DecreaseTrust {
                    target: peer,
                    category: TrustCategory::FoundGoal,
                });
            }
            self.drop_target(&target);
            return Step::Continue;
        }

        let matching = present
            .iter()
            .find(|o| target.block.matches(&o.block, colour_blind))
            .cloned();
        let object = match matching {
            Some(object) => object,
            None => {
                info!(agent = %self.id, location = %target.location, originator = ?originator, "reported goal block differs");
                if let Some(peer) = originator {
                    self.ledger.decrease(&peer, TrustCategory::FoundGoal);
                }
                self.drop_target(&target);
                let finds: Vec<_> = present.into_iter().filter(|o| self.wanted(&o.block)).collect();
                for object in finds {
                    self.broadcast(GossipMessage::FoundGoalBlock {
                        block: object.block.clone(),
                        location: object.location,
                    });
                    self.beliefs
                        .add_found(FoundGoalBlock::observed(object.block, object.location));
                }
                return Step::Continue;
            }
        };

        if let Some(peer) = &originator {
            self.ledger.increase(peer, TrustCategory::FoundGoal);
        }
        self.beliefs.remove_found(&target.block, target.location);
        self.broadcast(GossipMessage::PickingUpGoalBlock {
            block: object.block.clone(),
            location: object.location,
        });
        self.carried.push(CarriedBlock {
            object: object.id.clone(),
            block: object.block,
            slot: target.slot,
            relocate_to: None,
        });
        self.carried.sort_by_key(|c| c.slot);
        self.goal = None;
        debug!(agent = %self.id, slot = target.slot, carrying = self.carried.len(), "goal grabbed");

        let more = self.carried.len() < self.config.carry_capacity && self.beliefs.open_slots().next().is_some();
        self.enter(if more { Phase::ChooseGoal } else { Phase::DropGoal });
        Step::Act(AgentAction::Grab(object.id))
    }

    pub(crate) fn drop_goal(&mut self, view: &dyn WorldView) -> Step {
        let (slot_index, relocate_to) = match self.carried.first() {
            Some(front) => (front.slot, front.relocate_to),
            None => {
                self.enter(Phase::ChooseGoal);
                return Step::Continue;
            }
        };
        let slot = match self.beliefs.drop_off(slot_index) {
            Some(slot) => slot.clone(),
            None => {
                self.carried.remove(0);
                return Step::Continue;
            }
        };

        let relocate_to = match relocate_to {
            Some(dest) => Some(dest),
            None if slot.delivered => {
                let (dx, dy) = self.config.orphan_offset;
                let dest = slot.location.offset(dx, dy);
                info!(agent = %self.id, slot = slot.index, %dest, "slot delivered by a teammate, setting block aside");
                if let Some(front) = self.carried.first_mut() {
                    front.relocate_to = Some(dest);
                }
                Some(dest)
            }
            None => None,
        };

        let here = view.location();
        let dest = relocate_to.unwrap_or(slot.location);
        if let NavStep::Move(direction) = view.next_step(here, dest) {
            return Step::Act(AgentAction::Move(direction));
        }

        if relocate_to.is_none() && !self.beliefs.ready_for_delivery(slot.index) {
            trace!(agent = %self.id, slot = slot.index, "waiting for previous slot");
            return Step::Act(AgentAction::Idle);
        }

        let carried = self.carried.remove(0);
        if relocate_to.is_some() {
            self.beliefs.release(carried.slot);
            self.broadcast(GossipMessage::FoundGoalBlock {
                block: carried.block.clone(),
                location: dest,
            });
            self.beliefs
                .add_found(FoundGoalBlock::observed(carried.block, dest));
        } else {
            self.beliefs.mark_delivered(carried.slot);
            self.broadcast(GossipMessage::DroppedGoalBlock {
                block: carried.block,
                location: dest,
            });
            debug!(agent = %self.id, slot = carried.slot, "goal delivered");
        }

        if self.carried.is_empty() {
            self.enter(Phase::ChooseGoal);
        }
        Step::Act(AgentAction::Drop(Some(carried.object)))
    }
}
