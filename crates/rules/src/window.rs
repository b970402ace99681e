// SPDX-License-Identifier: MIT

//! A rolling observation window (§3 "rule-engine target state": "a rolling
//! window of observations for the rule"), bounded by elapsed time rather
//! than a fixed sample count so `trend`-style detectors see a consistent
//! lookback regardless of sampling rate.

use crate::observation::Observation;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    window_ms: u64,
    buf: VecDeque<Observation>,
}

impl RollingWindow {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms, buf: VecDeque::new() }
    }

    /// Push `obs` and evict anything older than `window_ms` relative to it.
    /// `window_ms == 0` disables eviction (an unbounded lookback).
    pub fn push(&mut self, obs: Observation) {
        self.buf.push_back(obs);
        if self.window_ms == 0 {
            return;
        }
        while let Some(front) = self.buf.front() {
            if obs.ts.saturating_sub(front.ts) > self.window_ms {
                self.buf.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn last(&self) -> Option<Observation> {
        self.buf.back().copied()
    }

    pub fn first(&self) -> Option<Observation> {
        self.buf.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
