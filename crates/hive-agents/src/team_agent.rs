//! Team Agent — the phase state machine that drives one team member.
//!
//! Each tick the agent drains its inbox into its beliefs, refreshes where
//! it can see its teammates, then runs the handler of its current phase.
//! A handler either produces this tick's action or switches phase and lets
//! the next handler run within the same tick. A phase that cannot make
//! progress idles and tries again on the next tick.
//!
//! ```text
//! ChooseRoom -> GoToRoom -> OpenDoor -> SearchRoom -> ChooseGoal -> GrabGoal -> DropGoal
//!      ^                                                  |  ^                      |
//!      +--------------------------------------------------+  +----------------------+
//! ```

use crate::behavior::Temperament;
use crate::beliefs::Beliefs;
use crate::claim::Vantage;
use crate::config::AgentConfig;
use hive_core::agent::{Agent, Decision};
use hive_core::gossip::{Envelope, GossipMessage, MessageId};
use hive_core::model::{DropOff, FoundGoalBlock, Provenance};
use hive_core::trust::{TrustCategory, TrustLedger, TrustPolicy};
use hive_core::types::*;
use hive_core::world::WorldView;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Upper bound on phase switches within one tick.
const MAX_TRANSITIONS_PER_TICK: usize = 8;

/// Outcome of one phase handler.
pub(crate) enum Step {
    /// This tick's action.
    Act(AgentAction),
    /// The phase changed; run the new phase's handler now.
    Continue,
}

/// The walk to a claimed room.
#[derive(Debug, Clone)]
pub(crate) struct Trip {
    pub room: String,
    pub travelled: u32,
    /// Give up after this many steps.
    pub abandon_after: Option<u32>,
    /// Who searched the room before this agent claimed it.
    pub previous_searcher: Option<AgentId>,
}

/// An ongoing room search.
#[derive(Debug, Clone)]
pub(crate) struct Search {
    pub room: String,
    pub route: Vec<Location>,
    /// Index of the next waypoint to reach.
    pub waypoint: usize,
    /// Number of waypoints that will actually be walked.
    pub route_end: usize,
    pub previous_searcher: Option<AgentId>,
    pub found: Vec<FoundGoalBlock>,
}

/// The believed block this agent is walking to.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalTarget {
    pub block: BlockDescriptor,
    pub location: Location,
    pub slot: usize,
    pub provenance: Provenance,
}

/// A block in this agent's hands.
#[derive(Debug, Clone, PartialEq)]
pub struct CarriedBlock {
    pub object: ObjectId,
    pub block: BlockDescriptor,
    pub slot: usize,
    /// Set when the slot was delivered by someone else and the block must be put aside.
    pub relocate_to: Option<Location>,
}

/// Waypoints on every room's search route.
pub const SEARCH_ROUTE_LEN: usize = 6;

/// The fixed interior route covering a room's footprint, starting at its entry.
pub fn search_route(entry: Location) -> Vec<Location> {
    vec![
        entry,
        entry.offset(0, -1),
        entry.offset(0, -2),
        entry.offset(0, -3),
        entry.offset(-1, -3),
        entry.offset(-1, -2),
    ]
}

/// A team member coordinating through gossip.
pub struct TeamAgent {
    pub(crate) id: AgentId,
    pub(crate) ordinal: usize,
    pub(crate) config: AgentConfig,
    pub(crate) temperament: Temperament,
    pub(crate) phase: Phase,
    pub(crate) beliefs: Beliefs,
    pub(crate) ledger: TrustLedger,
    surveyed: bool,
    /// Envelopes already absorbed, with their send tick.
    seen: HashMap<MessageId, Tick>,
    outbox: Vec<GossipMessage>,

    pub(crate) trip: Option<Trip>,
    pub(crate) search: Option<Search>,
    pub(crate) goal: Option<GoalTarget>,
    pub(crate) carried: Vec<CarriedBlock>,
}

impl TeamAgent {
    pub fn new(id: impl Into<AgentId>, config: AgentConfig, policy: TrustPolicy) -> Self {
        let id = id.into();
        let temperament = Temperament::new(config.profile, config.seed);
        Self {
            ledger: TrustLedger::new(id.clone(), policy),
            id,
            ordinal: 0,
            config,
            temperament,
            phase: Phase::ChooseRoom,
            beliefs: Beliefs::default(),
            surveyed: false,
            seen: HashMap::new(),
            outbox: Vec::new(),
            trip: None,
            search: None,
            goal: None,
            carried: Vec::new(),
        }
    }

    /// A cooperative agent with default trust constants.
    pub fn cooperative(id: impl Into<AgentId>) -> Self {
        Self::new(id, AgentConfig::default(), TrustPolicy::default())
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn beliefs(&self) -> &Beliefs {
        &self.beliefs
    }

    pub fn carried(&self) -> &[CarriedBlock] {
        &self.carried
    }

    pub fn goal(&self) -> Option<&GoalTarget> {
        self.goal.as_ref()
    }

    /// Envelope ids still held for duplicate detection.
    pub fn remembered_envelopes(&self) -> usize {
        self.seen.len()
    }

    /// Name of the room being walked to or searched.
    pub fn current_room(&self) -> Option<&str> {
        match (&self.trip, &self.search) {
            (Some(trip), _) => Some(&trip.room),
            (_, Some(search)) => Some(&search.room),
            _ => None,
        }
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        if phase != self.phase {
            debug!(agent = %self.id, from = %self.phase, to = %phase, "phase transition");
            self.phase = phase;
        }
    }

    pub(crate) fn broadcast(&mut self, message: GossipMessage) {
        self.outbox.push(message);
    }

    /// Teammates currently contending in `phase` whose position is known
    /// and whom we trust for `category`.
    pub(crate) fn rivals(&self, phase: Phase, category: TrustCategory) -> Vec<Vantage> {
        self.beliefs
            .peers()
            .iter()
            .filter(|p| p.phase == phase && self.ledger.is_trusted(&p.id, category))
            .filter_map(|p| {
                p.location.map(|location| Vantage {
                    agent: p.id.clone(),
                    ordinal: p.ordinal,
                    location,
                })
            })
            .collect()
    }

    pub(crate) fn vantage(&self, location: Location) -> Vantage {
        Vantage {
            agent: self.id.clone(),
            ordinal: self.ordinal,
            location,
        }
    }

    /// Whether `block` satisfies a slot still awaiting delivery.
    pub(crate) fn wanted(&self, block: &BlockDescriptor) -> bool {
        self.beliefs
            .outstanding_slots()
            .any(|d| d.block.matches(block, self.config.colour_blind))
    }

    fn survey(&mut self, view: &dyn WorldView) {
        let survey = view.survey();
        self.ordinal = survey
            .team
            .iter()
            .position(|id| *id == self.id)
            .unwrap_or(survey.team.len());
        self.beliefs = Beliefs::from_survey(&self.id, &survey);
        for peer in &survey.team {
            self.ledger.meet(peer);
        }
        self.surveyed = true;
        debug!(
            agent = %self.id,
            ordinal = self.ordinal,
            rooms = self.beliefs.rooms().len(),
            slots = self.beliefs.drop_offs().len(),
            "world surveyed"
        );
    }

    fn refresh_peers(&mut self, view: &dyn WorldView) {
        let ids: Vec<AgentId> = self.beliefs.peers().iter().map(|p| p.id.clone()).collect();
        for id in ids {
            let location = view.peer_location(&id);
            self.beliefs.set_peer_location(&id, location);
        }
    }

    fn step(&mut self, view: &dyn WorldView) -> Step {
        match self.phase {
            Phase::ChooseRoom => self.choose_room(view),
            Phase::GoToRoom => self.go_to_room(view),
            Phase::OpenDoor => self.open_door(),
            Phase::SearchRoom => self.search_room(view),
            Phase::ChooseGoal => self.choose_goal(view),
            Phase::GrabGoal => self.grab_goal(view),
            Phase::DropGoal => self.drop_goal(view),
        }
    }
}

impl Agent for TeamAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn decide(&mut self, tick: Tick, view: &dyn WorldView, inbox: &[Envelope]) -> Decision {
        if !self.surveyed {
            self.survey(view);
        }
        let window = self.config.dedupe_window;
        self.seen.retain(|_, sent_at| sent_at.saturating_add(window) >= tick);
        for envelope in inbox {
            // Older than the window, a duplicate could no longer be recognised.
            if envelope.sent_at.saturating_add(window) < tick {
                trace!(agent = %self.id, from = %envelope.from, sent_at = envelope.sent_at, "dropping stale envelope");
                continue;
            }
            if self.seen.insert(envelope.id, envelope.sent_at).is_none() {
                self.beliefs.absorb(&mut self.ledger, envelope);
            }
        }
        self.refresh_peers(view);

        // Coming back to a phase already run this tick means nothing can
        // progress until new gossip or movement arrives.
        let mut action = AgentAction::Idle;
        let mut entered = vec![self.phase];
        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            let before = self.phase;
            if let Step::Act(chosen) = self.step(view) {
                action = chosen;
                break;
            }
            if self.phase != before {
                if entered.contains(&self.phase) {
                    break;
                }
                entered.push(self.phase);
            }
        }
        Decision {
            action,
            outbox: std::mem::take(&mut self.outbox),
        }
    }

    fn drop_offs(&self) -> &[DropOff] {
        self.beliefs.drop_offs()
    }

    fn ledger(&self) -> &TrustLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut TrustLedger {
        &mut self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_covers_two_columns() {
        let route = search_route(Location::new(5, 5));
        assert_eq!(route.len(), SEARCH_ROUTE_LEN);
        assert_eq!(route[0], Location::new(5, 5));
        assert_eq!(route[3], Location::new(5, 2));
        assert_eq!(route[5], Location::new(4, 3));
    }

    #[test]
    fn new_agent_starts_choosing_a_room() {
        let agent = TeamAgent::cooperative("alice");
        assert_eq!(agent.phase(), Phase::ChooseRoom);
        assert!(agent.carried().is_empty());
        assert!(!agent.believes_complete());
    }
}
