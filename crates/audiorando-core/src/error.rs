//! Error taxonomy for the engine.
//!
//! Every variant describes a single rejected operation. None of them is fatal
//! and none leaves the pool partially mutated.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// More bytes were requested than are currently pooled. Recoverable by
    /// waiting for more frames.
    #[error("not enough entropy: need {needed} bytes, {available} available")]
    InsufficientEntropy { needed: usize, available: usize },

    /// Malformed output parameters (zero or oversized length, zero dice).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Dice bounds with `min >= max`.
    #[error("invalid range: min {min} must be below max {max}")]
    InvalidRange { min: i64, max: i64 },

    /// Start-time configuration that cannot produce a working engine.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Whether waiting for more frames could make the same call succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientEntropy { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_entropy_message_carries_counts() {
        let err = EngineError::InsufficientEntropy {
            needed: 32,
            available: 7,
        };
        assert_eq!(
            err.to_string(),
            "not enough entropy: need 32 bytes, 7 available"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_request_errors_not_recoverable() {
        assert!(!EngineError::InvalidRequest("size".into()).is_recoverable());
        assert!(!EngineError::InvalidRange { min: 6, max: 1 }.is_recoverable());
    }
}
