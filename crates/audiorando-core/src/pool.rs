//! Bounded FIFO entropy pool.
//!
//! The pool is the one piece of state that outlives a single tick or request.
//! Tick-driven [`EntropyPool::admit`] and request-driven
//! [`EntropyPool::withdraw`] serialize on one internal mutex that guards the
//! bytes and the counters together, so a pool shared by reference between
//! threads never exposes a partial write or a torn [`PoolStats`] snapshot.
//!
//! Overflow policy: the pool caps at capacity by dropping the excess *newly
//! admitted* bytes. Bytes already resident are never evicted to make room.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::error::{EngineError, EngineResult};

#[derive(Default)]
struct PoolState {
    buffer: Vec<u8>,
    total_admitted: u64,
    total_withdrawn: u64,
    total_discarded: u64,
}

/// Thread-safe bounded byte pool.
pub struct EntropyPool {
    state: Mutex<PoolState>,
    capacity: usize,
}

impl EntropyPool {
    /// Create an empty pool holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(PoolState {
                buffer: Vec::with_capacity(capacity),
                ..Default::default()
            }),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append `bytes`, keeping only the first `capacity` bytes of the combined
    /// sequence. Returns the new pool length.
    pub fn admit(&self, bytes: &[u8]) -> usize {
        self.admit_counted(bytes).level
    }

    /// Same as [`admit`](Self::admit), but reports how many of `bytes` were
    /// kept alongside the resulting level. Both come from one critical section.
    pub fn admit_counted(&self, bytes: &[u8]) -> Admission {
        let mut state = self.state();
        let room = self.capacity.saturating_sub(state.buffer.len());
        let kept = bytes.len().min(room);
        state.buffer.extend_from_slice(&bytes[..kept]);
        state.total_admitted += kept as u64;
        let level = state.buffer.len();
        drop(state);

        if kept < bytes.len() {
            log::warn!(
                "pool at capacity ({}): dropped {} of {} admitted bytes",
                self.capacity,
                bytes.len() - kept,
                bytes.len()
            );
        }
        Admission {
            kept,
            dropped: bytes.len() - kept,
            level,
        }
    }

    /// Current pool length.
    pub fn available_bytes(&self) -> usize {
        self.state().buffer.len()
    }

    /// Remove and return the oldest `k` bytes, or fail without touching the
    /// pool when fewer than `k` are held.
    pub fn withdraw(&self, k: usize) -> EngineResult<Vec<u8>> {
        let mut state = self.state();
        if state.buffer.len() < k {
            return Err(EngineError::InsufficientEntropy {
                needed: k,
                available: state.buffer.len(),
            });
        }
        let chunk: Vec<u8> = state.buffer.drain(..k).collect();
        state.total_withdrawn += k as u64;
        let remaining = state.buffer.len();
        drop(state);

        log::debug!("withdrew {k} bytes, {remaining} remaining");
        Ok(chunk)
    }

    /// Discard everything currently pooled.
    pub fn reset(&self) {
        let mut state = self.state();
        let dropped = state.buffer.len();
        state.buffer.clear();
        state.total_discarded += dropped as u64;
        drop(state);
        log::info!("pool reset, discarded {dropped} bytes");
    }

    /// Consistent snapshot of pool counters.
    pub fn stats(&self) -> PoolStats {
        let state = self.state();
        PoolStats {
            available: state.buffer.len(),
            capacity: self.capacity,
            total_admitted: state.total_admitted,
            total_withdrawn: state.total_withdrawn,
            total_discarded: state.total_discarded,
        }
    }

    fn state(&self) -> MutexGuard<'_, PoolState> {
        // Every critical section leaves the state consistent, so a poisoned
        // lock is still safe to reuse.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Result of [`EntropyPool::admit_counted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Admission {
    /// Bytes appended to the pool.
    pub kept: usize,
    /// Bytes dropped at capacity.
    pub dropped: usize,
    /// Pool length right after the append.
    pub level: usize,
}

/// Pool counters for display.
///
/// Always satisfies `total_admitted == total_withdrawn + total_discarded + available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Bytes currently pooled.
    pub available: usize,
    /// Maximum bytes the pool holds.
    pub capacity: usize,
    /// Bytes accepted by `admit` since creation (dropped overflow excluded).
    pub total_admitted: u64,
    /// Bytes handed out by `withdraw` since creation.
    pub total_withdrawn: u64,
    /// Bytes thrown away by `reset`.
    pub total_discarded: u64,
}
