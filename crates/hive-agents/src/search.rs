//! Room phases: choosing, walking to, opening and searching a room.

use crate::claim::{contest, RoomSelection, Verdict};
use crate::team_agent::{search_route, Search, Step, TeamAgent, Trip};
use hive_core::gossip::GossipMessage;
use hive_core::model::FoundGoalBlock;
use hive_core::trust::TrustCategory;
use hive_core::types::*;
use hive_core::world::{NavStep, WorldView};
use tracing::{debug, info, trace};

impl TeamAgent {
    pub(crate) fn choose_room(&mut self, view: &dyn WorldView) -> Step {
        let me = self.vantage(view.location());
        let rivals = self.rivals(Phase::ChooseRoom, TrustCategory::RoomSearch);
        let verdict = {
            let selection = RoomSelection {
                rooms: self.beliefs.rooms(),
                navigator: view,
                ledger: &self.ledger,
            };
            contest(&selection, &me, &rivals)
        };

        match verdict {
            Verdict::Vacant => {
                self.enter(Phase::ChooseGoal);
                Step::Continue
            }
            Verdict::Yielded { candidate, to } => {
                trace!(agent = %self.id, room = %candidate.resource, rival = %to, "room claim lost");
                Step::Act(AgentAction::Idle)
            }
            Verdict::Won(candidate) => {
                let room = candidate.resource;
                let previous_searcher = self
                    .beliefs
                    .room(&room)
                    .and_then(|r| r.last_searcher.clone());
                self.beliefs.claim_room(&room, &self.id, true);
                let abandon_after = if self.beliefs.unvisited_rooms() > 0 {
                    self.temperament.abandon_point(candidate.distance)
                } else {
                    None
                };
                debug!(agent = %self.id, room = %room, distance = candidate.distance, "room claimed");
                self.broadcast(GossipMessage::MovingToRoom { room: room.clone() });
                self.trip = Some(Trip {
                    room,
                    travelled: 0,
                    abandon_after,
                    previous_searcher,
                });
                self.enter(Phase::GoToRoom);
                Step::Continue
            }
        }
    }

    pub(crate) fn go_to_room(&mut self, view: &dyn WorldView) -> Step {
        let (room, travelled, abandon_after) = match &self.trip {
            Some(trip) => (trip.room.clone(), trip.travelled, trip.abandon_after),
            None => {
                self.enter(Phase::ChooseRoom);
                return Step::Continue;
            }
        };
        let entry = match self.beliefs.room(&room) {
            Some(r) => r.entry,
            None => {
                self.trip = None;
                self.enter(Phase::ChooseRoom);
                return Step::Continue;
            }
        };

        if abandon_after.is_some_and(|limit| travelled >= limit) {
            info!(agent = %self.id, room = %room, travelled, "abandoning room trip");
            self.beliefs.unclaim_room(&room);
            self.trip = None;
            self.enter(Phase::ChooseRoom);
            return Step::Continue;
        }

        match view.next_step(view.location(), entry) {
            NavStep::Move(direction) => {
                if let Some(trip) = self.trip.as_mut() {
                    trip.travelled += 1;
                }
                Step::Act(AgentAction::Move(direction))
            }
            NavStep::Arrived => {
                self.enter(Phase::OpenDoor);
                Step::Continue
            }
        }
    }

    pub(crate) fn open_door(&mut self) -> Step {
        let trip = match self.trip.take() {
            Some(trip) => trip,
            None => {
                self.enter(Phase::ChooseRoom);
                return Step::Continue;
            }
        };
        let (door, entry) = match self.beliefs.room(&trip.room) {
            Some(r) => (r.door.clone(), r.entry),
            None => {
                self.enter(Phase::ChooseRoom);
                return Step::Continue;
            }
        };

        self.broadcast(GossipMessage::OpeningDoor { room: trip.room.clone() });
        self.broadcast(GossipMessage::SearchingRoom { room: trip.room.clone() });

        let route = search_route(entry);
        let route_end = if self.temperament.skip_search() {
            debug!(agent = %self.id, room = %trip.room, "cutting search short");
            self.config.skip_after_waypoint.saturating_add(1).min(route.len())
        } else {
            route.len()
        };

        if self.temperament.fabricate_claim() {
            self.fabricate_report(&route);
        }

        self.search = Some(Search {
            room: trip.room,
            route,
            waypoint: 0,
            route_end,
            previous_searcher: trip.previous_searcher,
            found: Vec::new(),
        });
        self.enter(Phase::SearchRoom);
        Step::Act(AgentAction::OpenDoor(door))
    }

    /// Broadcast a goal block that was never seen.
    fn fabricate_report(&mut self, route: &[Location]) {
        let wanted: Vec<BlockDescriptor> = self
            .beliefs
            .outstanding_slots()
            .map(|d| d.block.clone())
            .collect();
        let block = self.temperament.pick(&wanted).cloned();
        let location = self.temperament.pick(route).copied();
        if let (Some(block), Some(location)) = (block, location) {
            debug!(agent = %self.id, %location, "fabricating goal report");
            self.broadcast(GossipMessage::FoundGoalBlock { block, location });
        }
    }

    pub(crate) fn search_room(&mut self, view: &dyn WorldView) -> Step {
        let here = view.location();
        self.scan(view);

        let next = match self.search.as_mut() {
            Some(search) => {
                while search.waypoint < search.route_end && search.route[search.waypoint] == here {
                    search.waypoint += 1;
                }
                (search.waypoint < search.route_end).then(|| search.route[search.waypoint])
            }
            None => {
                self.enter(Phase::ChooseGoal);
                return Step::Continue;
            }
        };

        let target = match next {
            Some(target) => target,
            None => {
                self.finish_search();
                return Step::Continue;
            }
        };
        match view.next_step(here, target) {
            NavStep::Move(direction) => Step::Act(AgentAction::Move(direction)),
            NavStep::Arrived => {
                if let Some(search) = self.search.as_mut() {
                    search.waypoint += 1;
                }
                Step::Continue
            }
        }
    }

    /// Record visible goal blocks into the ongoing search.
    fn scan(&mut self, view: &dyn WorldView) {
        let colour_blind = self.config.colour_blind;
        let wanted: Vec<BlockDescriptor> = self
            .beliefs
            .outstanding_slots()
            .map(|d| d.block.clone())
            .collect();
        let drop_zone: Vec<Location> = self.beliefs.drop_offs().iter().map(|d| d.location).collect();
        let seen = view.sense(&|o| {
            !drop_zone.contains(&o.location) && wanted.iter().any(|w| w.matches(&o.block, colour_blind))
        });
        if let Some(search) = self.search.as_mut() {
            for object in seen {
                if !search.found.iter().any(|f| f.location == object.location) {
                    trace!(agent = %self.id, location = %object.location, "goal block sighted");
                    search.found.push(FoundGoalBlock::observed(object.block, object.location));
                }
            }
        }
    }

    fn finish_search(&mut self) {
        let search = match self.search.take() {
            Some(search) => search,
            None => {
                self.enter(Phase::ChooseGoal);
                return;
            }
        };

        if let Some(previous) = search.previous_searcher.as_ref().filter(|p| **p != self.id) {
            let missed = search
                .found
                .iter()
                .any(|b| !self.beliefs.was_reported_by(previous, b.location));
            if missed {
                info!(agent = %self.id, room = %search.room, peer = %previous, "previous search missed goal blocks");
                self.ledger.decrease(previous, TrustCategory::RoomSearch);
            } else {
                self.ledger.increase(previous, TrustCategory::RoomSearch);
            }
        }

        if let Some(room) = self.beliefs.room_mut(&search.room) {
            room.last_searcher = Some(self.id.clone());
        }
        debug!(agent = %self.id, room = %search.room, found = search.found.len(), "room searched");
        for belief in search.found {
            self.broadcast(GossipMessage::FoundGoalBlock {
                block: belief.block.clone(),
                location: belief.location,
            });
            self.beliefs.add_found(belief);
        }
        self.enter(Phase::ChooseGoal);
    }
}
