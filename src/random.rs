//! Deterministic seeded random stream
//!
//! Boards must be reproducible bit-for-bit from a seed string on every
//! platform. The stream therefore uses only 32-bit integer arithmetic: the
//! seed string is hashed with xmur3 (over its UTF-16 code units) and the
//! resulting state drives a mulberry32 generator.

use rand::RngCore;
use std::time::{SystemTime, UNIX_EPOCH};

/// Deterministic uniform generator over `[0, 1)`
///
/// Every stage of board generation draws from one shared stream in a fixed
/// order; that order is part of the reproducibility contract.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Seed the stream from a string
    ///
    /// An empty string is not special here; use [`SeededRandom::resolve_seed`]
    /// to apply the time-based fallback first.
    pub fn from_seed_str(seed: &str) -> Self {
        Self {
            state: hash_seed(seed),
        }
    }

    /// Return the seed string a board should actually use
    ///
    /// Non-empty seeds are passed through. An empty seed is replaced with a
    /// string derived from the current time, so the run is not reproducible
    /// from the original input but can be replayed from the returned string.
    pub fn resolve_seed(seed: &str) -> String {
        if !seed.is_empty() {
            return seed.to_string();
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        format!("t{:x}", nanos)
    }

    /// Next raw 32-bit output (mulberry32)
    fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_raw()) / 4_294_967_296.0
    }

    /// Next value in `[low, high)`
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Uniform index in `0..len`
    ///
    /// `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() needs a non-empty range");
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Fisher–Yates shuffle consuming one draw per position
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// xmur3 string hash reduced to a single 32-bit state
fn hash_seed(seed: &str) -> u32 {
    let units: Vec<u16> = seed.encode_utf16().collect();
    let mut h = 1_779_033_703u32 ^ units.len() as u32;
    for unit in units {
        h = (h ^ u32::from(unit)).wrapping_mul(3_432_918_353);
        h = h.rotate_left(13);
    }
    h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
    h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
    h ^ (h >> 16)
}

// Lets callers feed the board stream into `rand` distributions. The generator
// itself only uses `next_f64` so layouts do not depend on `rand` internals.
impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_raw());
        let low = u64::from(self.next_raw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
