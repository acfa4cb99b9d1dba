//! Trust ledger — per-peer reliability scores by task category.
//!
//! Each agent scores every teammate separately for drop-offs, room
//! searches and goal-block reports. Scores move only by the fixed
//! increment and decrement of their category. A peer whose score falls to
//! or below the category threshold is no longer believed in that category.
//!
//! An agent never scores itself: updates naming the owner are no-ops and
//! the owner is always trusted.

use crate::error::Result;
use crate::types::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// The kinds of claim a peer can be trusted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustCategory {
    /// Claims about delivering blocks to drop-off slots.
    DropOff,
    /// Claims about having searched a room.
    RoomSearch,
    /// Claims about goal blocks found in the world.
    FoundGoal,
}

impl TrustCategory {
    pub const ALL: [TrustCategory; 3] = [
        TrustCategory::DropOff,
        TrustCategory::RoomSearch,
        TrustCategory::FoundGoal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrustCategory::DropOff => "drop_off",
            TrustCategory::RoomSearch => "room_search",
            TrustCategory::FoundGoal => "found_goal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for TrustCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring constants for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Score given to a peer on first encounter.
    pub initial: f64,
    /// Subtracted after a verified false claim.
    pub decrement: f64,
    /// Added after a verified true claim.
    pub increment: f64,
    /// A peer is trusted while its score is strictly above this.
    pub threshold: f64,
}

impl CategoryPolicy {
    pub fn new(initial: f64, decrement: f64, increment: f64, threshold: f64) -> Self {
        Self {
            initial,
            decrement,
            increment,
            threshold,
        }
    }
}

/// Scoring constants for all three categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustPolicy {
    pub drop_off: CategoryPolicy,
    pub room_search: CategoryPolicy,
    pub found_goal: CategoryPolicy,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            drop_off: CategoryPolicy::new(0.5, 0.2, 0.1, 0.0),
            room_search: CategoryPolicy::new(0.5, 0.2, 0.1, 0.0),
            found_goal: CategoryPolicy::new(0.5, 0.25, 0.1, 0.0),
        }
    }
}

impl TrustPolicy {
    pub fn category(&self, category: TrustCategory) -> &CategoryPolicy {
        match category {
            TrustCategory::DropOff => &self.drop_off,
            TrustCategory::RoomSearch => &self.room_search,
            TrustCategory::FoundGoal => &self.found_goal,
        }
    }

    /// Scores for a peer nobody has judged yet.
    pub fn initial_scores(&self) -> CategoryScores {
        CategoryScores {
            drop_off: self.drop_off.initial,
            room_search: self.room_search.initial,
            found_goal: self.found_goal.initial,
        }
    }
}

/// One score per category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub drop_off: f64,
    pub room_search: f64,
    pub found_goal: f64,
}

impl CategoryScores {
    pub fn get(&self, category: TrustCategory) -> f64 {
        match category {
            TrustCategory::DropOff => self.drop_off,
            TrustCategory::RoomSearch => self.room_search,
            TrustCategory::FoundGoal => self.found_goal,
        }
    }

    fn get_mut(&mut self, category: TrustCategory) -> &mut f64 {
        match category {
            TrustCategory::DropOff => &mut self.drop_off,
            TrustCategory::RoomSearch => &mut self.room_search,
            TrustCategory::FoundGoal => &mut self.found_goal,
        }
    }

    /// Mean over the three categories.
    pub fn overall(&self) -> f64 {
        (self.drop_off + self.room_search + self.found_goal) / 3.0
    }
}

/// Persisted trust in one peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustRecord {
    pub peer: AgentId,
    pub scores: CategoryScores,
}

/// A score change applied by the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustChange {
    pub peer: AgentId,
    pub category: TrustCategory,
    pub before: f64,
    pub after: f64,
}

/// Key-value store for trust records, keyed by the owning agent.
///
/// Each agent identity owns exactly one record set and is its only writer.
pub trait TrustStore {
    /// Records saved for `owner`, or `None` if nothing was ever saved.
    fn load(&self, owner: &AgentId) -> Result<Option<Vec<TrustRecord>>>;

    /// Replace the record set of `owner`.
    fn save(&mut self, owner: &AgentId, records: &[TrustRecord]) -> Result<()>;
}

/// An agent's trust in each of its teammates.
#[derive(Debug, Clone)]
pub struct TrustLedger {
    owner: AgentId,
    policy: TrustPolicy,
    scores: BTreeMap<AgentId, CategoryScores>,
}

impl TrustLedger {
    pub fn new(owner: AgentId, policy: TrustPolicy) -> Self {
        Self {
            owner,
            policy,
            scores: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> &AgentId {
        &self.owner
    }

    pub fn policy(&self) -> &TrustPolicy {
        &self.policy
    }

    /// Start tracking `peer` at the initial scores. Known peers keep theirs.
    pub fn meet(&mut self, peer: &AgentId) {
        if *peer == self.owner {
            return;
        }
        let initial = self.policy.initial_scores();
        self.scores.entry(peer.clone()).or_insert(initial);
    }

    /// Number of peers with a record.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Current scores of `peer`; initial scores for a stranger.
    pub fn scores(&self, peer: &AgentId) -> CategoryScores {
        self.scores
            .get(peer)
            .copied()
            .unwrap_or_else(|| self.policy.initial_scores())
    }

    pub fn score(&self, peer: &AgentId, category: TrustCategory) -> f64 {
        self.scores(peer).get(category)
    }

    /// Whether claims of `peer` in `category` are believed.
    pub fn is_trusted(&self, peer: &AgentId, category: TrustCategory) -> bool {
        if *peer == self.owner {
            return true;
        }
        self.score(peer, category) > self.policy.category(category).threshold
    }

    /// Mean score of `peer` over all categories.
    pub fn overall(&self, peer: &AgentId) -> f64 {
        self.scores(peer).overall()
    }

    /// Whether an accusation broadcast by `peer` is acted on.
    pub fn accepts_accusations_from(&self, peer: &AgentId) -> bool {
        *peer == self.owner || self.overall(peer) > 0.0
    }

    /// Reward a verified true claim.
    pub fn increase(&mut self, peer: &AgentId, category: TrustCategory) -> Option<TrustChange> {
        let delta = self.policy.category(category).increment;
        let change = self.adjust(peer, category, delta)?;
        debug!(
            owner = %self.owner,
            peer = %peer,
            category = %category,
            score = change.after,
            "trust increased"
        );
        Some(change)
    }

    /// Penalise a verified false claim.
    pub fn decrease(&mut self, peer: &AgentId, category: TrustCategory) -> Option<TrustChange> {
        let delta = -self.policy.category(category).decrement;
        let change = self.adjust(peer, category, delta)?;
        info!(
            owner = %self.owner,
            peer = %peer,
            category = %category,
            score = change.after,
            trusted = self.is_trusted(peer, category),
            "trust decreased"
        );
        Some(change)
    }

    fn adjust(&mut self, peer: &AgentId, category: TrustCategory, delta: f64) -> Option<TrustChange> {
        if *peer == self.owner {
            return None;
        }
        let initial = self.policy.initial_scores();
        let scores = self.scores.entry(peer.clone()).or_insert(initial);
        let slot = scores.get_mut(category);
        let before = *slot;
        *slot += delta;
        Some(TrustChange {
            peer: peer.clone(),
            category,
            before,
            after: *slot,
        })
    }

    /// All records, ordered by peer id.
    pub fn records(&self) -> Vec<TrustRecord> {
        self.scores
            .iter()
            .map(|(peer, scores)| TrustRecord {
                peer: peer.clone(),
                scores: *scores,
            })
            .collect()
    }

    /// Overwrite scores with persisted records. Records about the owner are skipped.
    pub fn restore(&mut self, records: impl IntoIterator<Item = TrustRecord>) {
        for record in records {
            if record.peer != self.owner {
                self.scores.insert(record.peer, record.scores);
            }
        }
    }

    /// Restore the owner's records from `store`. Returns how many were loaded.
    pub fn load_from(&mut self, store: &dyn TrustStore) -> Result<usize> {
        let records = store.load(&self.owner)?.unwrap_or_default();
        let count = records.len();
        self.restore(records);
        debug!(owner = %self.owner, count, "trust records loaded");
        Ok(count)
    }

    /// Save the owner's records to `store`.
    pub fn persist_to(&self, store: &mut dyn TrustStore) -> Result<()> {
        let records = self.records();
        store.save(&self.owner, &records)?;
        debug!(owner = %self.owner, count = records.len(), "trust records saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ledger() -> TrustLedger {
        TrustLedger::new(AgentId::from("alice"), TrustPolicy::default())
    }

    #[test]
    fn strangers_start_at_initial_scores() {
        let l = ledger();
        let bob = AgentId::from("bob");
        assert_eq!(l.score(&bob, TrustCategory::FoundGoal), 0.5);
        assert!(l.is_trusted(&bob, TrustCategory::DropOff));
    }

    #[test]
    fn changes_are_exactly_the_configured_constants() {
        let mut l = ledger();
        let bob = AgentId::from("bob");
        let down = l.decrease(&bob, TrustCategory::FoundGoal).unwrap();
        assert_eq!(down.before, 0.5);
        assert!((down.after - 0.25).abs() < 1e-9);
        let up = l.increase(&bob, TrustCategory::FoundGoal).unwrap();
        assert!((up.after - 0.35).abs() < 1e-9);
        // Other categories are untouched.
        assert_eq!(l.score(&bob, TrustCategory::RoomSearch), 0.5);
    }

    #[test]
    fn self_updates_are_no_ops() {
        let mut l = ledger();
        let me = AgentId::from("alice");
        assert!(l.decrease(&me, TrustCategory::DropOff).is_none());
        assert!(l.increase(&me, TrustCategory::DropOff).is_none());
        l.meet(&me);
        assert!(l.is_empty());
        assert!(l.is_trusted(&me, TrustCategory::DropOff));
    }

    #[test]
    fn falls_below_threshold_after_repeated_lies() {
        let mut l = ledger();
        let bob = AgentId::from("bob");
        l.decrease(&bob, TrustCategory::FoundGoal);
        assert!(l.is_trusted(&bob, TrustCategory::FoundGoal));
        l.decrease(&bob, TrustCategory::FoundGoal);
        assert!(!l.is_trusted(&bob, TrustCategory::FoundGoal));
    }

    #[test]
    fn accusations_gated_by_overall_trust() {
        let mut l = ledger();
        let bob = AgentId::from("bob");
        assert!(l.accepts_accusations_from(&bob));
        for _ in 0..3 {
            for c in TrustCategory::ALL {
                l.decrease(&bob, c);
            }
        }
        assert!(l.overall(&bob) < 0.0);
        assert!(!l.accepts_accusations_from(&bob));
    }

    #[derive(Default)]
    struct MapStore(HashMap<AgentId, Vec<TrustRecord>>);

    impl TrustStore for MapStore {
        fn load(&self, owner: &AgentId) -> Result<Option<Vec<TrustRecord>>> {
            Ok(self.0.get(owner).cloned())
        }

        fn save(&mut self, owner: &AgentId, records: &[TrustRecord]) -> Result<()> {
            self.0.insert(owner.clone(), records.to_vec());
            Ok(())
        }
    }

    #[test]
    fn ledger_survives_a_store_round_trip() {
        let mut store = MapStore::default();
        let bob = AgentId::from("bob");
        let mut l = ledger();
        l.decrease(&bob, TrustCategory::DropOff);
        l.persist_to(&mut store).unwrap();

        let mut fresh = ledger();
        assert_eq!(fresh.load_from(&store).unwrap(), 1);
        assert!((fresh.score(&bob, TrustCategory::DropOff) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn category_names_parse_back() {
        for c in TrustCategory::ALL {
            assert_eq!(TrustCategory::parse(c.as_str()), Some(c));
        }
        assert_eq!(TrustCategory::parse("bogus"), None);
    }
}
