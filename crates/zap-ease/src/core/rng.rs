//! Seedable pseudo-random number generator (xorshift64) for shake jitter.
//! Deterministic, so shaken tweens replay identically for a given seed.

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform sample in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit the f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform sample in [-radius / 2, radius / 2).
    pub fn jitter(&mut self, radius: f32) -> f32 {
        self.next_f32() * radius - radius / 2.0
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(42)
    }
}
