//! 32-bit xorshift generator for timing dither.
//!
//! Not a source of secrecy: the seed is a fixed constant so interval
//! sequences reproduce exactly for a given rate and call count.

/// Seed used at startup.
pub const DEFAULT_SEED: u32 = 0x2545_F491;

/// Marsaglia xorshift32 (shifts 13, 17, 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xorshift32 {
    state: u32,
}

impl Default for Xorshift32 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Xorshift32 {
    /// Create a generator. A zero seed would lock the generator at zero and
    /// is replaced by [`DEFAULT_SEED`].
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Current generator state.
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance and return the next value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Advance and return a value in `[-bound, +bound]`.
    #[inline]
    pub fn next_symmetric(&mut self, bound: u32) -> i32 {
        let span = 2 * bound + 1;
        (self.next_u32() % span) as i32 - bound as i32
    }
}
