//! Beliefs — one agent's private picture of the world.
//!
//! Rooms, drop-off slots, goal-block beliefs and teammate status live here
//! and change only through the mutation methods below, either because the
//! agent saw something itself or because gossip told it so.

use hive_core::model::{DropOff, FoundGoalBlock, PeerStatus, Room};
use hive_core::types::*;
use hive_core::world::WorldSurvey;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A pickup a teammate announced, remembered so repeats change nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PendingPickup {
    pub location: Location,
    /// The slot marked grabbed on the teammate's behalf, if any.
    pub slot: Option<usize>,
}

/// Agent-local world model.
#[derive(Debug, Clone, Default)]
pub struct Beliefs {
    rooms: Vec<Room>,
    drop_offs: Vec<DropOff>,
    found: Vec<FoundGoalBlock>,
    peers: Vec<PeerStatus>,
    /// Every (reporter, location) goal-block report ever heard.
    reports: HashSet<(AgentId, Location)>,
    pub(crate) pending_pickups: HashMap<AgentId, PendingPickup>,
    /// Slots this agent marked grabbed for itself.
    held_slots: BTreeSet<usize>,
}

impl Beliefs {
    /// Build the initial model from a world survey, as seen by `me`.
    pub fn from_survey(me: &AgentId, survey: &WorldSurvey) -> Self {
        let rooms = survey
            .rooms
            .iter()
            .map(|r| Room::new(r.name.clone(), r.door.clone(), r.door_location))
            .collect();
        let drop_offs = survey
            .drop_zone
            .iter()
            .enumerate()
            .map(|(i, slot)| DropOff::new(i, slot.block.clone(), slot.location))
            .collect();
        let peers = survey
            .team
            .iter()
            .enumerate()
            .filter(|(_, id)| *id != me)
            .map(|(ordinal, id)| PeerStatus::new(id.clone(), ordinal))
            .collect();
        Self {
            rooms,
            drop_offs,
            peers,
            ..Self::default()
        }
    }

    // --- Rooms ---

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    pub(crate) fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.name == name)
    }

    /// Record that `searcher` claimed `name`.
    pub fn claim_room(&mut self, name: &str, searcher: &AgentId, by_me: bool) {
        if let Some(room) = self.room_mut(name) {
            room.visited = true;
            room.last_searcher = Some(searcher.clone());
            if by_me {
                room.visited_by_me = true;
            }
        }
    }

    /// Forget that this agent claimed `name`. The team still sees it as visited.
    pub fn unclaim_room(&mut self, name: &str) {
        if let Some(room) = self.room_mut(name) {
            room.visited_by_me = false;
        }
    }

    pub fn unvisited_rooms(&self) -> usize {
        self.rooms.iter().filter(|r| !r.visited).count()
    }

    // --- Drop-off slots ---

    pub fn drop_offs(&self) -> &[DropOff] {
        &self.drop_offs
    }

    pub fn drop_off(&self, index: usize) -> Option<&DropOff> {
        self.drop_offs.get(index)
    }

    /// Slots that still need a block and that nobody is fetching, in rank order.
    pub fn open_slots(&self) -> impl Iterator<Item = &DropOff> {
        self.drop_offs.iter().filter(|d| d.is_open())
    }

    /// Slots not yet delivered.
    pub fn outstanding_slots(&self) -> impl Iterator<Item = &DropOff> {
        self.drop_offs.iter().filter(|d| !d.delivered)
    }

    /// The slot occupying `location`, if any.
    pub fn slot_at(&self, location: Location) -> Option<usize> {
        self.drop_offs
            .iter()
            .find(|d| d.location == location)
            .map(|d| d.index)
    }

    /// Whether slot `index` may receive its block now.
    pub fn ready_for_delivery(&self, index: usize) -> bool {
        index == 0
            || self
                .drop_offs
                .get(index - 1)
                .map(|d| d.delivered)
                .unwrap_or(false)
    }

    /// Mark `index` as being fetched, by this agent when `mine`.
    pub fn mark_grabbed(&mut self, index: usize, mine: bool) {
        if let Some(slot) = self.drop_offs.get_mut(index) {
            slot.grabbed = true;
            if mine {
                self.held_slots.insert(index);
            }
        }
    }

    /// Nobody is fetching `index` any more.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.drop_offs.get_mut(index) {
            slot.grabbed = false;
        }
        self.held_slots.remove(&index);
    }

    pub fn mark_delivered(&mut self, index: usize) {
        if let Some(slot) = self.drop_offs.get_mut(index) {
            slot.delivered = true;
        }
        self.held_slots.remove(&index);
    }

    pub fn held_slots(&self) -> &BTreeSet<usize> {
        &self.held_slots
    }

    pub fn all_delivered(&self) -> bool {
        !self.drop_offs.is_empty() && self.drop_offs.iter().all(|d| d.delivered)
    }

    // --- Goal-block beliefs ---

    pub fn found(&self) -> &[FoundGoalBlock] {
        &self.found
    }

    /// Add a belief unless one with the same colour, shape and location exists.
    pub fn add_found(&mut self, belief: FoundGoalBlock) -> bool {
        if self
            .found
            .iter()
            .any(|b| b.describes_same_block(&belief.block, belief.location))
        {
            return false;
        }
        self.found.push(belief);
        true
    }

    /// The belief about `block` at `location`.
    pub fn belief(&self, block: &BlockDescriptor, location: Location) -> Option<&FoundGoalBlock> {
        self.found
            .iter()
            .find(|b| b.describes_same_block(block, location))
    }

    /// Drop the belief about `block` at `location`.
    pub fn remove_found(&mut self, block: &BlockDescriptor, location: Location) -> Option<FoundGoalBlock> {
        let idx = self
            .found
            .iter()
            .position(|b| b.describes_same_block(block, location))?;
        Some(self.found.remove(idx))
    }

    /// Remember that `reporter` reported a goal block at `location`.
    pub fn record_report(&mut self, reporter: &AgentId, location: Location) {
        self.reports.insert((reporter.clone(), location));
    }

    pub fn was_reported_by(&self, reporter: &AgentId, location: Location) -> bool {
        self.reports.contains(&(reporter.clone(), location))
    }

    // --- Teammates ---

    pub fn peers(&self) -> &[PeerStatus] {
        &self.peers
    }

    pub fn peer(&self, id: &AgentId) -> Option<&PeerStatus> {
        self.peers.iter().find(|p| p.id == *id)
    }

    pub fn set_peer_phase(&mut self, id: &AgentId, phase: Phase) {
        if let Some(peer) = self.peers.iter_mut().find(|p| p.id == *id) {
            peer.phase = phase;
        }
    }

    pub fn set_peer_location(&mut self, id: &AgentId, location: Option<Location>) {
        if let Some(peer) = self.peers.iter_mut().find(|p| p.id == *id) {
            peer.location = location;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::world::{DropZoneSlot, RoomLayout};

    fn survey() -> WorldSurvey {
        WorldSurvey {
            rooms: vec![RoomLayout {
                name: "room_0".into(),
                door: ObjectId::new("door_0"),
                door_location: Location::new(2, 2),
            }],
            drop_zone: vec![
                DropZoneSlot {
                    block: BlockDescriptor::new("#ff0000", 0, 0.5),
                    location: Location::new(10, 12),
                },
                DropZoneSlot {
                    block: BlockDescriptor::new("#00ff00", 1, 0.5),
                    location: Location::new(10, 11),
                },
            ],
            team: vec![AgentId::from("a"), AgentId::from("b"), AgentId::from("c")],
        }
    }

    #[test]
    fn survey_builds_model_without_self() {
        let b = Beliefs::from_survey(&AgentId::from("b"), &survey());
        assert_eq!(b.rooms().len(), 1);
        assert_eq!(b.drop_offs()[1].index, 1);
        let ordinals: Vec<usize> = b.peers().iter().map(|p| p.ordinal).collect();
        assert_eq!(ordinals, vec![0, 2]);
    }

    #[test]
    fn duplicate_beliefs_are_not_added() {
        let mut b = Beliefs::from_survey(&AgentId::from("a"), &survey());
        let block = BlockDescriptor::new("#ff0000", 0, 0.5);
        assert!(b.add_found(FoundGoalBlock::observed(block.clone(), Location::new(3, 4))));
        assert!(!b.add_found(FoundGoalBlock::gossiped(
            block.clone(),
            Location::new(3, 4),
            AgentId::from("b"),
        )));
        assert_eq!(b.found().len(), 1);
    }

    #[test]
    fn delivery_readiness_follows_rank() {
        let mut b = Beliefs::from_survey(&AgentId::from("a"), &survey());
        assert!(b.ready_for_delivery(0));
        assert!(!b.ready_for_delivery(1));
        b.mark_delivered(0);
        assert!(b.ready_for_delivery(1));
        assert!(!b.all_delivered());
    }

    #[test]
    fn grabbing_and_releasing_tracks_own_slots() {
        let mut b = Beliefs::from_survey(&AgentId::from("a"), &survey());
        b.mark_grabbed(0, true);
        assert_eq!(b.open_slots().next().map(|d| d.index), Some(1));
        assert!(b.held_slots().contains(&0));
        b.release(0);
        assert!(b.held_slots().is_empty());
        assert_eq!(b.open_slots().count(), 2);
    }
}
