//! # audiorando-core
//!
//! **Ambient noise in, reproducible-on-demand randomness out.**
//!
//! `audiorando-core` is the entropy engine behind audiorando. An audio
//! collaborator pushes one frame of frequency-bin magnitudes per tick; the
//! engine gates it on signal quality, whitens it, and pools the surviving
//! bytes. On request it withdraws a fixed chunk and stretches it with a hash
//! into a password, hex string, big number, or a set of dice rolls.
//!
//! ## Quick Start
//!
//! ```
//! use audiorando_core::{Engine, EngineConfig, OutputRequest, SampleFrame};
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//!
//! // One tick of 128 frequency bins from the microphone analyser
//! let bins: Vec<u8> = (0..128u32).map(|i| (i * 37 % 251) as u8 + 1).collect();
//! let outcome = engine.on_frame(&SampleFrame::new(bins));
//! println!("pool: {} bytes, quality {:.1}", outcome.pool_level, outcome.quality);
//!
//! // 64 whitened bytes pooled; a password withdraws 32 of them
//! let password = engine.generate(&OutputRequest::Password { length: 16 }).unwrap();
//! assert_eq!(password.to_string().len(), 16);
//!
//! // Running dry is an error, never a wait
//! engine.generate(&OutputRequest::HexString { bytes: 8 }).unwrap();
//! assert!(engine.generate(&OutputRequest::HexString { bytes: 8 }).is_err());
//! ```
//!
//! ## Architecture
//!
//! Frame → QualityEstimator → Whitener → EntropyPool → OutputDeriver / Dice
//!
//! - [`frame::score`]: population standard deviation; flat frames are dropped.
//! - [`conditioning::whiten`]: pairwise debiasing, never invents bytes.
//! - [`EntropyPool`]: bounded FIFO, all-or-nothing withdrawal.
//! - [`OutputDeriver`]: counter-mode hash stretching plus formatting.
//! - [`dice::roll_many`]: eight bytes per roll, big-endian, modulo range.
//!
//! Nothing is persisted. A withdrawn chunk is used once and dropped.

pub mod conditioning;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod frame;
pub mod output;
pub mod pool;

pub use conditioning::{DigestAlgorithm, stretch, whiten};
pub use config::EngineConfig;
pub use dice::{DiceRoll, roll_many};
pub use engine::{Engine, FrameOutcome, FrameVerdict};
pub use error::{EngineError, EngineResult};
pub use frame::SampleFrame;
pub use output::{DEFAULT_CHARSET, DerivedOutput, OutputDeriver, OutputRequest, OutputValue};
pub use pool::{Admission, EntropyPool, PoolStats};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
