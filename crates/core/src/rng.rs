use rand::{rngs::StdRng, seq::SliceRandom, RngCore, SeedableRng};

/// The single seedable random source threaded through scoring and boss logic.
#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// One-in-`sides` chance.
    pub fn roll(&mut self, sides: u64) -> bool {
        if sides == 0 {
            return false;
        }
        self.next_u64() % sides == 0
    }

    pub fn range_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        let span = (max - min) as u64;
        min + (self.next_u64() % (span + 1)) as i64
    }

    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u64() % len as u64) as usize)
    }
}
