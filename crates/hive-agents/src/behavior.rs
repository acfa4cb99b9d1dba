//! Behaviour profiles — how faithfully an agent does its share.
//!
//! Unreliable teammates run the same state machine as everyone else. The
//! profile only gates three branches of it: abandoning a room trip early,
//! cutting a room search short, and broadcasting a fabricated goal-block
//! report. Every other decision is identical across profiles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Which unreliable behaviours an agent exhibits, and how often.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorProfile {
    /// Does every task it commits to.
    #[default]
    Cooperative,
    /// Sometimes gives up on the way to a room or skips part of a search.
    Lazy {
        abandon_probability: f64,
        skip_probability: f64,
    },
    /// Sometimes reports goal blocks that do not exist, and gives up early.
    Liar {
        lie_probability: f64,
        abandon_probability: f64,
    },
}

impl BehaviorProfile {
    pub fn lazy(probability: f64) -> Self {
        BehaviorProfile::Lazy {
            abandon_probability: probability,
            skip_probability: probability,
        }
    }

    pub fn liar(probability: f64) -> Self {
        BehaviorProfile::Liar {
            lie_probability: probability,
            abandon_probability: probability,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BehaviorProfile::Cooperative => "cooperative",
            BehaviorProfile::Lazy { .. } => "lazy",
            BehaviorProfile::Liar { .. } => "liar",
        }
    }

    fn abandon_probability(&self) -> f64 {
        match self {
            BehaviorProfile::Cooperative => 0.0,
            BehaviorProfile::Lazy { abandon_probability, .. } => *abandon_probability,
            BehaviorProfile::Liar { abandon_probability, .. } => *abandon_probability,
        }
    }

    fn skip_probability(&self) -> f64 {
        match self {
            BehaviorProfile::Lazy { skip_probability, .. } => *skip_probability,
            _ => 0.0,
        }
    }

    fn lie_probability(&self) -> f64 {
        match self {
            BehaviorProfile::Liar { lie_probability, .. } => *lie_probability,
            _ => 0.0,
        }
    }

    /// The probabilities this profile uses, by name.
    pub fn probabilities(&self) -> [(&'static str, f64); 3] {
        [
            ("abandon_probability", self.abandon_probability()),
            ("skip_probability", self.skip_probability()),
            ("lie_probability", self.lie_probability()),
        ]
    }
}

/// A behaviour profile bound to its own random source.
///
/// Seeded temperaments make adversarial runs reproducible.
pub struct Temperament {
    profile: BehaviorProfile,
    rng: StdRng,
}

impl Temperament {
    pub fn new(profile: BehaviorProfile, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { profile, rng }
    }

    pub fn profile(&self) -> BehaviorProfile {
        self.profile
    }

    fn roll(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        self.rng.random_bool(probability.min(1.0))
    }

    /// How many steps into a trip of `path_length` moves to give up, if at all.
    ///
    /// A trip is only ever abandoned in its first half; a give-up point
    /// drawn in the second half means the trip is completed.
    pub fn abandon_point(&mut self, path_length: u32) -> Option<u32> {
        if path_length < 2 || !self.roll(self.profile.abandon_probability()) {
            return None;
        }
        let step = self.rng.random_range(1..=path_length);
        (step <= path_length / 2).then_some(step)
    }

    /// Whether to cut the next room search short.
    pub fn skip_search(&mut self) -> bool {
        self.roll(self.profile.skip_probability())
    }

    /// Whether to broadcast a fabricated goal-block report.
    pub fn fabricate_claim(&mut self) -> bool {
        self.roll(self.profile.lie_probability())
    }

    /// A uniformly chosen element, used to dress up fabricated reports.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..items.len());
        items.get(idx)
    }
}
