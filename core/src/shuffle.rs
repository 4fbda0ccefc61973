use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Pending randomized forward order over snapshot indices.
///
/// Forward navigation is shuffled and visits every index once per cycle;
/// backward navigation is plain modular stepping (see [`previous_index`])
/// and never touches the queue. That asymmetry is intentional.
#[derive(Debug)]
pub struct ShuffleSequencer {
    pending: VecDeque<usize>,
    rng: StdRng,
}

impl Default for ShuffleSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShuffleSequencer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            pending: VecDeque::new(),
            rng,
        }
    }

    /// Seeded constructor for reproducible orders.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Rebuild the queue as a uniform Fisher–Yates permutation of `[0, n)`.
    ///
    /// When `avoid` is given and `n > 1`, the head is guaranteed to differ
    /// from it: a matching head is swapped with a uniformly chosen later
    /// slot, which keeps the rest of the order unbiased beyond that one
    /// swap. With `n <= 1` the constraint cannot be honored and is ignored.
    pub fn reseed(&mut self, n: usize, avoid: Option<usize>) {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);

        if let Some(avoid) = avoid {
            if n > 1 && order[0] == avoid {
                let swap_with = self.rng.gen_range(1..n);
                order.swap(0, swap_with);
            }
        }

        self.pending = order.into();
    }

    /// Pop the next forward index. `None` means the cycle has drained and the
    /// caller should reseed, passing the index currently on screen as
    /// `avoid`. The sequencer holds no notion of "current" itself.
    pub fn next(&mut self) -> Option<usize> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Drop any pending order, e.g. after the snapshot is replaced.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Backward step: `(current - 1 + n) mod n`. Sequential on purpose, never
/// shuffled. `None` when the snapshot is empty.
pub fn previous_index(current: usize, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    Some((current + n - 1) % n)
}
