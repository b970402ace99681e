// SPDX-License-Identifier: MIT

//! Per-key strict-FIFO operation queue.
//!
//! The archive writes one JSONL file per `(source, ref, date)` and must
//! never interleave two writes to the same file, while writes to different
//! files should proceed concurrently. `PathOpQueue` gives every distinct key
//! its own ordered mailbox backed by a single worker task, spawned lazily on
//! first use. Lane count is bounded: once `MAX_LANES` distinct keys are
//! live, inserting a new one evicts the least-recently-used lane, dropping
//! its sender so the worker task drains and exits on its own.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Bound on a single lane's pending-job mailbox. A lane backing up past this
/// means its worker is stalled (e.g. blocked on disk I/O); `submit` then
/// exerts backpressure by waiting for room rather than growing unbounded.
const LANE_CAPACITY: usize = 64;

/// Bound on the number of concurrently live lanes. Exceeding it evicts the
/// idlest lane rather than growing the worker pool without limit.
const MAX_LANES: usize = 256;

struct Lane {
    tx: mpsc::Sender<Job>,
    last_used: Instant,
}

/// A registry of per-key FIFO lanes.
#[derive(Clone, Default)]
pub struct PathOpQueue {
    lanes: Arc<Mutex<HashMap<String, Lane>>>,
}

impl PathOpQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `job` to run after every previously submitted job for `key`
    /// has completed. Spawns the lane's worker task the first time `key` is
    /// seen.
    pub async fn submit<F>(&self, key: &str, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let tx = self.lane_sender(key);
        // Sender clone is cheap; if the worker task has somehow died the
        // send simply drops the job rather than panicking the caller.
        let _ = tx.send(Box::pin(job)).await;
    }

    /// Like [`submit`](Self::submit), but returns a handle the caller can
    /// await to learn when `job` has actually run — used by tests and by
    /// callers that need to observe completion (e.g. an admin command
    /// waiting for a retention sweep to finish).
    pub async fn submit_and_wait<F>(&self, key: &str, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        self.submit(key, async move {
            job.await;
            let _ = done_tx.send(());
        })
        .await;
        let _ = done_rx.await;
    }

    fn lane_sender(&self, key: &str) -> mpsc::Sender<Job> {
        let mut lanes = self.lanes.lock();
        if let Some(lane) = lanes.get_mut(key) {
            lane.last_used = Instant::now();
            return lane.tx.clone();
        }
        if lanes.len() >= MAX_LANES {
            Self::evict_lru(&mut lanes);
        }
        let (tx, mut rx) = mpsc::channel::<Job>(LANE_CAPACITY);
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job.await;
            }
        });
        lanes.insert(key.to_string(), Lane { tx: tx.clone(), last_used: Instant::now() });
        tx
    }

    /// Drop the lane untouched longest. Dropping its sender closes the
    /// channel; the worker task's `recv` loop ends once the mailbox drains,
    /// so the task exits on its own without needing a cancellation signal.
    fn evict_lru(lanes: &mut HashMap<String, Lane>) {
        let Some(oldest_key) = lanes.iter().min_by_key(|(_, lane)| lane.last_used).map(|(k, _)| k.clone())
        else {
            return;
        };
        lanes.remove(&oldest_key);
    }

    /// Number of lanes currently tracked (for diagnostics/tests; bounded by
    /// `MAX_LANES` via LRU eviction of idle lanes).
    pub fn lane_count(&self) -> usize {
        self.lanes.lock().len()
    }
}

#[cfg(test)]
#[path = "opqueue_tests.rs"]
mod tests;
