//! Claim resolution — who gets a contested room or goal block.
//!
//! No agent can ask a rival what it intends. Instead it re-runs the same
//! selection logic from each rival's position and checks whether the rival
//! would pick the same resource. When two agents want the same thing, the
//! shorter path wins and equal paths go to the lower roster ordinal, so
//! agents holding the same beliefs always agree on the winner.

use crate::beliefs::Beliefs;
use hive_core::model::Room;
use hive_core::trust::{TrustCategory, TrustLedger};
use hive_core::types::*;
use hive_core::world::Navigator;
use std::cmp::Ordering;

/// An agent's position in a contest.
#[derive(Debug, Clone, PartialEq)]
pub struct Vantage {
    pub agent: AgentId,
    pub ordinal: usize,
    pub location: Location,
}

/// A resource an agent would pick, with its path length.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<R> {
    pub resource: R,
    pub distance: u32,
}

/// Selection logic shared by an agent and its simulated rivals.
pub trait Selection {
    type Resource: PartialEq + Clone;

    /// What an agent standing at `from` would pick.
    fn select(&self, from: &Vantage) -> Option<Candidate<Self::Resource>>;
}

/// Outcome of a contest.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<R> {
    /// Nothing to pick.
    Vacant,
    /// The resource is ours.
    Won(Candidate<R>),
    /// A rival wants the same resource and has priority.
    Yielded { candidate: Candidate<R>, to: AgentId },
}

/// Whether a rival at `(distance, ordinal)` beats us at `(distance, ordinal)`.
pub fn outranks(rival: (u32, usize), mine: (u32, usize)) -> bool {
    rival.0 < mine.0 || (rival.0 == mine.0 && rival.1 < mine.1)
}

/// Decide whether `me` may take what it would pick, given its rivals.
pub fn contest<S: Selection>(selection: &S, me: &Vantage, rivals: &[Vantage]) -> Verdict<S::Resource> {
    let mine = match selection.select(me) {
        Some(candidate) => candidate,
        None => return Verdict::Vacant,
    };
    for rival in rivals {
        if rival.agent == me.agent {
            continue;
        }
        let theirs = match selection.select(rival) {
            Some(candidate) => candidate,
            None => continue,
        };
        if theirs.resource != mine.resource {
            continue;
        }
        if outranks((theirs.distance, rival.ordinal), (mine.distance, me.ordinal)) {
            return Verdict::Yielded {
                candidate: mine,
                to: rival.agent.clone(),
            };
        }
    }
    Verdict::Won(mine)
}

/// Picks the nearest room that still needs searching.
///
/// Unvisited rooms come first. Once every room has been visited, an agent
/// re-searches rooms it has not searched itself, nearest first, and among
/// equally near rooms the one whose last searcher is least trusted.
pub struct RoomSelection<'a, N: Navigator + ?Sized> {
    pub rooms: &'a [Room],
    pub navigator: &'a N,
    pub ledger: &'a TrustLedger,
}

impl<N: Navigator + ?Sized> RoomSelection<'_, N> {
    fn searched_by(room: &Room, who: &AgentId, owner: &AgentId) -> bool {
        if who == owner {
            room.visited_by_me
        } else {
            room.last_searcher.as_ref() == Some(who)
        }
    }

    fn searcher_trust(&self, room: &Room) -> f64 {
        match &room.last_searcher {
            Some(peer) if peer != self.ledger.owner() => self.ledger.score(peer, TrustCategory::RoomSearch),
            _ => f64::MAX,
        }
    }
}

impl<N: Navigator + ?Sized> Selection for RoomSelection<'_, N> {
    type Resource = String;

    fn select(&self, from: &Vantage) -> Option<Candidate<String>> {
        let fresh = self
            .rooms
            .iter()
            .filter(|r| !r.visited)
            .filter_map(|r| self.navigator.path_length(from.location, r.entry).map(|d| (r, d)))
            .min_by_key(|(_, d)| *d);
        if let Some((room, distance)) = fresh {
            return Some(Candidate {
                resource: room.name.clone(),
                distance,
            });
        }

        let owner = self.ledger.owner();
        self.rooms
            .iter()
            .filter(|r| !Self::searched_by(r, &from.agent, owner))
            .filter_map(|r| self.navigator.path_length(from.location, r.entry).map(|d| (r, d)))
            .min_by(|(a, da), (b, db)| {
                da.cmp(db).then_with(|| {
                    self.searcher_trust(a)
                        .partial_cmp(&self.searcher_trust(b))
                        .unwrap_or(Ordering::Equal)
                })
            })
            .map(|(room, distance)| Candidate {
                resource: room.name.clone(),
                distance,
            })
    }
}

/// Picks the nearest believed goal block for one of the target slots.
pub struct GoalSelection<'a, N: Navigator + ?Sized> {
    pub beliefs: &'a Beliefs,
    pub navigator: &'a N,
    pub ledger: &'a TrustLedger,
    /// Slots the picker is fetching for, in preference order.
    pub slots: &'a [usize],
    pub colour_blind: bool,
}

impl<N: Navigator + ?Sized> GoalSelection<'_, N> {
    /// The first target slot `block` satisfies.
    pub fn slot_for(&self, block: &BlockDescriptor) -> Option<usize> {
        self.slots.iter().copied().find(|&i| {
            self.beliefs
                .drop_off(i)
                .map(|d| d.block.matches(block, self.colour_blind))
                .unwrap_or(false)
        })
    }
}

impl<N: Navigator + ?Sized> Selection for GoalSelection<'_, N> {
    type Resource = Location;

    fn select(&self, from: &Vantage) -> Option<Candidate<Location>> {
        self.beliefs
            .found()
            .iter()
            .filter(|b| {
                b.provenance
                    .originator()
                    .map(|peer| self.ledger.is_trusted(peer, TrustCategory::FoundGoal))
                    .unwrap_or(true)
            })
            .filter(|b| self.slot_for(&b.block).is_some())
            .filter_map(|b| {
                self.navigator
                    .path_length(from.location, b.location)
                    .map(|d| (b.location, d))
            })
            .min_by_key(|(location, d)| (*d, *location))
            .map(|(resource, distance)| Candidate { resource, distance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::model::FoundGoalBlock;
    use hive_core::trust::TrustPolicy;
    use hive_core::world::{DropZoneSlot, NavStep, RoomLayout, WorldSurvey};

    struct Manhattan;

    impl Navigator for Manhattan {
        fn next_step(&self, _from: Location, _to: Location) -> NavStep {
            NavStep::Arrived
        }

        fn path_length(&self, from: Location, to: Location) -> Option<u32> {
            Some(from.manhattan(&to))
        }
    }

    fn vantage(name: &str, ordinal: usize, x: i32, y: i32) -> Vantage {
        Vantage {
            agent: AgentId::from(name),
            ordinal,
            location: Location::new(x, y),
        }
    }

    fn one_room() -> Vec<Room> {
        // Entry at (0, 1).
        vec![Room::new("room_0", ObjectId::new("door_0"), Location::new(0, 0))]
    }

    #[test]
    fn shorter_distance_wins() {
        let rooms = one_room();
        let ledger = TrustLedger::new(AgentId::from("a"), TrustPolicy::default());
        let sel = RoomSelection { rooms: &rooms, navigator: &Manhattan, ledger: &ledger };
        let a = vantage("a", 1, 0, 5);
        let b = vantage("b", 0, 0, 7);
        assert!(matches!(contest(&sel, &a, &[b.clone()]), Verdict::Won(c) if c.distance == 4));
        assert_eq!(
            contest(&sel, &b, &[a]),
            Verdict::Yielded {
                candidate: Candidate { resource: "room_0".into(), distance: 6 },
                to: AgentId::from("a"),
            }
        );
    }

    #[test]
    fn equal_distance_goes_to_lower_ordinal() {
        let rooms = one_room();
        let ledger = TrustLedger::new(AgentId::from("a"), TrustPolicy::default());
        let sel = RoomSelection { rooms: &rooms, navigator: &Manhattan, ledger: &ledger };
        let a = vantage("a", 0, 3, 1);
        let b = vantage("b", 1, -3, 1);
        assert!(matches!(contest(&sel, &a, &[b.clone()]), Verdict::Won(_)));
        assert!(matches!(contest(&sel, &b, &[a]), Verdict::Yielded { .. }));
    }

    #[test]
    fn rivals_wanting_something_else_do_not_conflict() {
        let mut rooms = one_room();
        rooms.push(Room::new("room_1", ObjectId::new("door_1"), Location::new(20, 0)));
        let ledger = TrustLedger::new(AgentId::from("a"), TrustPolicy::default());
        let sel = RoomSelection { rooms: &rooms, navigator: &Manhattan, ledger: &ledger };
        let a = vantage("a", 1, 0, 9);
        let b = vantage("b", 0, 20, 2);
        assert!(matches!(contest(&sel, &a, &[b]), Verdict::Won(c) if c.resource == "room_0"));
    }

    #[test]
    fn revisits_least_trusted_searcher_first() {
        let ledger = {
            let mut l = TrustLedger::new(AgentId::from("a"), TrustPolicy::default());
            l.decrease(&AgentId::from("c"), TrustCategory::RoomSearch);
            l
        };
        let mut rooms = vec![
            Room::new("by_b", ObjectId::new("d0"), Location::new(-2, 0)),
            Room::new("by_c", ObjectId::new("d1"), Location::new(2, 0)),
        ];
        rooms[0].visited = true;
        rooms[0].last_searcher = Some(AgentId::from("b"));
        rooms[1].visited = true;
        rooms[1].last_searcher = Some(AgentId::from("c"));
        let sel = RoomSelection { rooms: &rooms, navigator: &Manhattan, ledger: &ledger };
        let choice = sel.select(&vantage("a", 0, 0, 1)).unwrap();
        assert_eq!(choice.resource, "by_c");
    }

    #[test]
    fn nothing_left_is_vacant() {
        let mut rooms = one_room();
        rooms[0].visited = true;
        rooms[0].visited_by_me = true;
        let ledger = TrustLedger::new(AgentId::from("a"), TrustPolicy::default());
        let sel = RoomSelection { rooms: &rooms, navigator: &Manhattan, ledger: &ledger };
        assert_eq!(contest(&sel, &vantage("a", 0, 0, 0), &[]), Verdict::Vacant);
    }

    #[test]
    fn goal_selection_respects_slot_and_colour_blindness() {
        let red = BlockDescriptor::new("#ff0000", 0, 0.5);
        let blue_same_shape = BlockDescriptor::new("#0000ff", 0, 0.5);
        let survey = WorldSurvey {
            rooms: vec![RoomLayout {
                name: "r".into(),
                door: ObjectId::new("d"),
                door_location: Location::new(0, 0),
            }],
            drop_zone: vec![DropZoneSlot { block: red.clone(), location: Location::new(9, 9) }],
            team: vec![AgentId::from("a")],
        };
        let me = AgentId::from("a");
        let mut beliefs = Beliefs::from_survey(&me, &survey);
        beliefs.add_found(FoundGoalBlock::observed(blue_same_shape, Location::new(1, 0)));
        beliefs.add_found(FoundGoalBlock::observed(red, Location::new(5, 0)));
        let ledger = TrustLedger::new(me, TrustPolicy::default());
        let slots = [0];

        let sighted = GoalSelection {
            beliefs: &beliefs,
            navigator: &Manhattan,
            ledger: &ledger,
            slots: &slots,
            colour_blind: false,
        };
        let from = vantage("a", 0, 0, 0);
        assert_eq!(sighted.select(&from).unwrap().resource, Location::new(5, 0));

        let blind = GoalSelection { colour_blind: true, ..sighted };
        assert_eq!(blind.select(&from).unwrap().resource, Location::new(1, 0));
    }
}
