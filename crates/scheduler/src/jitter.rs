// SPDX-License-Identifier: MIT

//! Jitter source for quiet-hours deferral (§4.4 step 2: "adding jitter
//! uniformly in `[0, spreadMs)`"), abstracted behind a trait so tests can
//! pin the value instead of depending on `rand`'s actual output.

use rand::Rng;

pub trait Jitter: Send + Sync {
    /// A value in `0..spread_ms`, or `0` when `spread_ms == 0`.
    fn next_ms(&self, spread_ms: u64) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandJitter;

impl Jitter for RandJitter {
    fn next_ms(&self, spread_ms: u64) -> u64 {
        if spread_ms == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..spread_ms)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub u64);

#[cfg(any(test, feature = "test-support"))]
impl Jitter for FixedJitter {
    fn next_ms(&self, spread_ms: u64) -> u64 {
        if spread_ms == 0 {
            0
        } else {
            self.0 % spread_ms
        }
    }
}
