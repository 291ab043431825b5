#![forbid(unsafe_code)]

//! Random sources for angular jitter.
//!
//! Spawning perturbs each spark's angle by a small uniform offset. The source
//! is injectable so tests (and replays) can pin it down.

/// A source of uniform samples in `[0, 1)`.
pub trait JitterSource {
    fn next_unit(&mut self) -> f64;
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Always returns the midpoint, so sparks sit exactly on their ring slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn next_unit(&mut self) -> f64 {
        0.5
    }
}

// Any non-zero state works; this is the 64-bit golden ratio.
const FALLBACK_STATE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seeded xorshift64 generator. Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct XorshiftJitter {
    state: u64,
}

impl XorshiftJitter {
    pub const DEFAULT_SEED: u64 = 0x5EED;

    #[must_use]
    pub fn new(seed: u64) -> Self {
        // xorshift is stuck at 0 forever.
        let state = match seed.wrapping_add(1) {
            0 => FALLBACK_STATE,
            s => s,
        };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for XorshiftJitter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl JitterSource for XorshiftJitter {
    fn next_unit(&mut self) -> f64 {
        // Top 53 bits fill an f64 mantissa exactly.
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}
