use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the decisions taken by nondeterministic choice
pub trait ChoiceSource {
    /// Pick one of `alternatives` branches; `alternatives` is never 0.
    fn choose(&mut self, alternatives: usize) -> usize;
}

/// Uniform random choice
pub struct Entropy {
    rng: StdRng,
}

impl Entropy {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A reproducible sequence of choices
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ChoiceSource for Entropy {
    fn choose(&mut self, alternatives: usize) -> usize {
        self.rng.gen_range(0..alternatives)
    }
}

/// Replays a fixed list of picks, then keeps taking the first branch.
/// Picks out of range wrap around.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    picks: VecDeque<usize>,
}

impl Scripted {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }
}

impl ChoiceSource for Scripted {
    fn choose(&mut self, alternatives: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % alternatives
    }
}
