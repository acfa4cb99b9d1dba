//! Scripted world for driving a single agent through its phases.

#![allow(dead_code)]

use hive_core::prelude::*;
use std::collections::HashMap;

pub fn red() -> BlockDescriptor {
    BlockDescriptor::new("#ff0000", 0, 0.5)
}

pub fn green() -> BlockDescriptor {
    BlockDescriptor::new("#00ff00", 1, 0.5)
}

pub fn blue() -> BlockDescriptor {
    BlockDescriptor::new("#0000ff", 2, 0.5)
}

/// Open floor, Manhattan paths, one-tile sensing radius.
pub struct FakeWorld {
    pub me: Location,
    pub peers: HashMap<AgentId, Location>,
    pub objects: Vec<SensedObject>,
    pub survey: WorldSurvey,
}

impl FakeWorld {
    pub fn new(me: Location, survey: WorldSurvey) -> Self {
        Self {
            me,
            peers: HashMap::new(),
            objects: Vec::new(),
            survey,
        }
    }

    pub fn at(&self, me: Location) -> Self {
        Self {
            me,
            peers: self.peers.clone(),
            objects: self.objects.clone(),
            survey: self.survey.clone(),
        }
    }

    pub fn with_peer(mut self, id: &str, location: Location) -> Self {
        self.peers.insert(AgentId::from(id), location);
        self
    }

    pub fn with_object(mut self, id: &str, block: BlockDescriptor, location: Location) -> Self {
        self.objects.push(SensedObject {
            id: ObjectId::new(id),
            location,
            block,
        });
        self
    }
}

impl Navigator for FakeWorld {
    fn next_step(&self, from: Location, to: Location) -> NavStep {
        if from.x < to.x {
            NavStep::Move(Direction::East)
        } else if from.x > to.x {
            NavStep::Move(Direction::West)
        } else if from.y < to.y {
            NavStep::Move(Direction::South)
        } else if from.y > to.y {
            NavStep::Move(Direction::North)
        } else {
            NavStep::Arrived
        }
    }

    fn path_length(&self, from: Location, to: Location) -> Option<u32> {
        Some(from.manhattan(&to))
    }
}

impl Perception for FakeWorld {
    fn location(&self) -> Location {
        self.me
    }

    fn sense(&self, predicate: &dyn Fn(&SensedObject) -> bool) -> Vec<SensedObject> {
        self.objects
            .iter()
            .filter(|o| o.location.manhattan(&self.me) <= 1 && predicate(o))
            .cloned()
            .collect()
    }

    fn peer_location(&self, peer: &AgentId) -> Option<Location> {
        self.peers.get(peer).copied()
    }

    fn survey(&self) -> WorldSurvey {
        self.survey.clone()
    }
}

pub fn room(name: &str, door_x: i32, door_y: i32) -> RoomLayout {
    RoomLayout {
        name: name.to_string(),
        door: ObjectId::new(format!("door_{}", name)),
        door_location: Location::new(door_x, door_y),
    }
}

/// Two slots stacked at x = 10: red at (10, 12), green at (10, 11).
pub fn two_slot_zone() -> Vec<DropZoneSlot> {
    vec![
        DropZoneSlot { block: red(), location: Location::new(10, 12) },
        DropZoneSlot { block: green(), location: Location::new(10, 11) },
    ]
}

pub fn team(names: &[&str]) -> Vec<AgentId> {
    names.iter().map(|n| AgentId::from(*n)).collect()
}

pub fn gossip(from: &str, tick: Tick, message: GossipMessage) -> Envelope {
    Envelope::new(AgentId::from(from), tick, message)
}

/// Move the scripted agent if it asked to move.
pub fn apply(world: &mut FakeWorld, action: &AgentAction) {
    if let AgentAction::Move(direction) = action {
        let (dx, dy) = direction.delta();
        world.me = world.me.offset(dx, dy);
    }
}
