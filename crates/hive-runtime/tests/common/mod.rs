#![allow(dead_code)]

use hive_runtime::prelude::*;
use std::collections::HashMap;

pub fn red() -> BlockDescriptor {
    BlockDescriptor::new("#ff0000", 0, 0.5)
}

pub fn green() -> BlockDescriptor {
    BlockDescriptor::new("#00ff00", 1, 0.5)
}

/// Open grid without walls. Agents sense objects within one tile.
pub struct GridWorld {
    pub positions: HashMap<AgentId, Location>,
    pub floor: Vec<SensedObject>,
    pub held: HashMap<AgentId, Vec<SensedObject>>,
    pub survey: WorldSurvey,
    /// Slot indices in the order they were filled.
    pub deliveries: Vec<usize>,
    pub doors_jammed: bool,
}

impl GridWorld {
    /// Two rooms side by side with one goal block each, and a two-slot drop zone.
    pub fn two_rooms(team: &[AgentId], starts: &[Location]) -> Self {
        let survey = WorldSurvey {
            rooms: vec![
                RoomLayout {
                    name: "room_0".into(),
                    door: ObjectId::new("door_0"),
                    door_location: Location::new(0, 0),
                },
                RoomLayout {
                    name: "room_1".into(),
                    door: ObjectId::new("door_1"),
                    door_location: Location::new(6, 0),
                },
            ],
            drop_zone: vec![
                DropZoneSlot { block: red(), location: Location::new(10, 8) },
                DropZoneSlot { block: green(), location: Location::new(10, 7) },
            ],
            team: team.to_vec(),
        };
        let floor = vec![
            SensedObject { id: ObjectId::new("red_1"), location: Location::new(-1, -3), block: red() },
            SensedObject { id: ObjectId::new("green_1"), location: Location::new(5, -3), block: green() },
        ];
        Self {
            positions: team.iter().cloned().zip(starts.iter().copied()).collect(),
            floor,
            held: HashMap::new(),
            survey,
            deliveries: Vec::new(),
            doors_jammed: false,
        }
    }

    fn position(&self, agent: &AgentId) -> Location {
        self.positions.get(agent).copied().unwrap_or(Location::new(0, 0))
    }
}

struct AgentView<'a> {
    world: &'a GridWorld,
    me: AgentId,
}

impl Navigator for AgentView<'_> {
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

impl Perception for AgentView<'_> {
    fn location(&self) -> Location {
        self.world.position(&self.me)
    }

    fn sense(&self, predicate: &dyn Fn(&SensedObject) -> bool) -> Vec<SensedObject> {
        let here = self.location();
        self.world
            .floor
            .iter()
            .filter(|o| o.location.manhattan(&here) <= 1 && predicate(o))
            .cloned()
            .collect()
    }

    fn peer_location(&self, peer: &AgentId) -> Option<Location> {
        self.world.positions.get(peer).copied()
    }

    fn survey(&self) -> WorldSurvey {
        self.world.survey.clone()
    }
}

impl Environment for GridWorld {
    fn view<'a>(&'a self, agent: &AgentId) -> Box<dyn WorldView + 'a> {
        Box::new(AgentView { world: self, me: agent.clone() })
    }

    fn apply(&mut self, agent: &AgentId, action: &AgentAction) -> bool {
        let here = self.position(agent);
        match action {
            AgentAction::Idle => true,
            AgentAction::Move(direction) => {
                let (dx, dy) = direction.delta();
                self.positions.insert(agent.clone(), here.offset(dx, dy));
                true
            }
            AgentAction::OpenDoor(_) => !self.doors_jammed,
            AgentAction::Grab(id) => {
                match self.floor.iter().position(|o| o.id == *id && o.location == here) {
                    Some(i) => {
                        let object = self.floor.remove(i);
                        self.held.entry(agent.clone()).or_default().push(object);
                        true
                    }
                    None => false,
                }
            }
            AgentAction::Drop(id) => {
                let held = self.held.entry(agent.clone()).or_default();
                let index = match id {
                    Some(id) => held.iter().position(|o| o.id == *id),
                    None if held.is_empty() => None,
                    None => Some(0),
                };
                let Some(index) = index else { return false };
                let mut object = held.remove(index);
                object.location = here;
                if let Some(slot) = self
                    .survey
                    .drop_zone
                    .iter()
                    .position(|s| s.location == here && s.block.matches(&object.block, false))
                {
                    self.deliveries.push(slot);
                }
                self.floor.push(object);
                true
            }
        }
    }

    fn is_complete(&self) -> bool {
        (0..self.survey.drop_zone.len()).all(|slot| self.deliveries.contains(&slot))
    }
}

pub fn two_agent_config() -> TeamConfig {
    TeamConfig {
        agents: vec![
            AgentSpec::new("alice", AgentConfig::default()),
            AgentSpec::new("bob", AgentConfig::default()),
        ],
        ..TeamConfig::default()
    }
}

pub fn starts() -> Vec<Location> {
    vec![Location::new(0, 5), Location::new(4, 5)]
}
