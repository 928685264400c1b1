//! Dice rolls from a withdrawn chunk.
//!
//! Each roll consumes eight bytes read as a big-endian `u64`, reduced modulo
//! the inclusive range width. The modulo bias against a 64-bit value is
//! negligible for ranges of a few hundred faces and is accepted in place of
//! rejection sampling, which would make the byte cost per roll variable.

use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// Bytes consumed per roll.
pub const BYTES_PER_ROLL: usize = 8;

/// Result of [`roll_many`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiceRoll {
    /// Sum of all rolls. Wide enough for any count of full-range `i64` rolls.
    pub total: i128,
    /// Individual rolls in the order their bytes were consumed.
    pub rolls: Vec<i64>,
}

/// Bytes needed to roll `count` dice, or `None` on overflow.
pub fn bytes_needed(count: usize) -> Option<usize> {
    count.checked_mul(BYTES_PER_ROLL)
}

/// Check dice parameters without looking at any entropy.
pub fn validate(count: usize, min: i64, max: i64) -> EngineResult<usize> {
    if min >= max {
        return Err(EngineError::InvalidRange { min, max });
    }
    if count == 0 {
        return Err(EngineError::InvalidRequest(
            "dice count must be at least 1".to_string(),
        ));
    }
    bytes_needed(count)
        .ok_or_else(|| EngineError::InvalidRequest(format!("dice count {count} is too large")))
}

/// Roll `count` dice in `min..=max` using the first `8 * count` bytes of
/// `chunk`.
pub fn roll_many(count: usize, min: i64, max: i64, chunk: &[u8]) -> EngineResult<DiceRoll> {
    let needed = validate(count, min, max)?;
    if chunk.len() < needed {
        return Err(EngineError::InsufficientEntropy {
            needed,
            available: chunk.len(),
        });
    }

    let span = (max as i128 - min as i128 + 1) as u128;
    let rolls: Vec<i64> = chunk[..needed]
        .chunks_exact(BYTES_PER_ROLL)
        .map(|slice| {
            let mut word = [0u8; BYTES_PER_ROLL];
            word.copy_from_slice(slice);
            let v = u64::from_be_bytes(word) as u128 % span;
            (min as i128 + v as i128) as i64
        })
        .collect();
    let total = rolls.iter().map(|&r| r as i128).sum();

    Ok(DiceRoll { total, rolls })
}
