//! The engine facade: frames in, derived outputs out.
//!
//! ```text
//! on_frame:  frame → score → (> threshold) → whiten → pool.admit
//! generate:  request → validate → pool.withdraw → derive
//! ```
//!
//! Everything the shell needs to display comes back as a return value
//! ([`FrameOutcome`], [`DerivedOutput`]); the engine holds no UI state.

use std::sync::Mutex;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::conditioning::whiten;
use crate::error::EngineResult;
use crate::frame::{SampleFrame, passes, score};
use crate::output::{DerivedOutput, OutputDeriver, OutputRequest};
use crate::pool::{EntropyPool, PoolStats};

/// What happened to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum FrameVerdict {
    /// Whitened bytes offered to the pool. `bytes` counts those kept after
    /// the capacity cap.
    Admitted { bytes: usize },
    /// Score at or below the quality threshold.
    BelowThreshold,
    /// Passed the gate but whitening rejected every pair.
    NothingWhitened,
    /// Frame length differs from the configured frame size.
    WrongSize { expected: usize, actual: usize },
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameOutcome {
    pub pool_level: usize,
    pub quality: f64,
    #[serde(flatten)]
    pub verdict: FrameVerdict,
}

/// Entropy harvesting and output derivation engine.
pub struct Engine {
    config: EngineConfig,
    pool: EntropyPool,
    deriver: OutputDeriver,
    last_quality: Mutex<Option<f64>>,
}

impl Engine {
    /// Build an engine after validating `config`.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let pool = EntropyPool::new(config.pool_capacity);
        let deriver = OutputDeriver::new(config.digest, &config.charset, config.max_output_len)?;
        Ok(Self {
            config,
            pool,
            deriver,
            last_quality: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tick entry point.
    pub fn on_frame(&self, frame: &SampleFrame) -> FrameOutcome {
        let bins = frame.as_bytes();
        let quality = score(bins);
        *self.last_quality.lock().unwrap_or_else(|e| e.into_inner()) = Some(quality);

        let verdict = if bins.len() != self.config.frame_size {
            log::warn!(
                "ignoring frame of {} bins, expected {}",
                bins.len(),
                self.config.frame_size
            );
            FrameVerdict::WrongSize {
                expected: self.config.frame_size,
                actual: bins.len(),
            }
        } else if !passes(quality, self.config.quality_threshold) {
            FrameVerdict::BelowThreshold
        } else {
            let whitened = whiten(bins);
            if whitened.is_empty() {
                FrameVerdict::NothingWhitened
            } else {
                let admission = self.pool.admit_counted(&whitened);
                FrameVerdict::Admitted {
                    bytes: admission.kept,
                }
            }
        };

        let outcome = FrameOutcome {
            pool_level: self.pool.available_bytes(),
            quality,
            verdict,
        };
        log::debug!(
            "frame quality {:.2} -> {:?}, pool {}",
            quality,
            verdict,
            outcome.pool_level
        );
        outcome
    }

    /// Bytes currently pooled.
    pub fn available_entropy(&self) -> usize {
        self.pool.available_bytes()
    }

    /// Bytes a request would withdraw, after validating it.
    pub fn entropy_required(&self, request: &OutputRequest) -> EngineResult<usize> {
        request.validate(self.config.max_output_len)?;
        request.entropy_needed(self.config.chunk_size)
    }

    /// Withdraw exactly the bytes `request` needs and derive from them.
    /// A rejected request withdraws nothing.
    pub fn generate(&self, request: &OutputRequest) -> EngineResult<DerivedOutput> {
        let needed = self.entropy_required(request)?;
        let chunk = self.pool.withdraw(needed)?;
        let output = self.deriver.derive(request, &chunk)?;
        log::debug!(
            "generated {} from {} bytes, {} left",
            request.kind(),
            output.consumed,
            self.pool.available_bytes()
        );
        Ok(output)
    }

    /// Discard all pooled entropy.
    pub fn reset(&self) {
        self.pool.reset();
    }

    /// Score of the most recent frame, if any.
    pub fn last_quality(&self) -> Option<f64> {
        *self.last_quality.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

impl Default for Engine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            pool: EntropyPool::new(config.pool_capacity),
            deriver: OutputDeriver::default(),
            config,
            last_quality: Mutex::new(None),
        }
    }
}
