//! Output requests and their deterministic derivation from a withdrawn chunk.
//!
//! [`OutputDeriver::derive`] never reads the pool. It is handed exactly the
//! bytes a prior withdrawal produced, stretches them with
//! [`crate::conditioning::stretch`] and formats the result. The same
//! `(request, chunk)` always yields the same output, which is why a chunk must
//! never be reused for a second real request.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::conditioning::{DigestAlgorithm, stretch};
use crate::dice::{self, DiceRoll};
use crate::error::{EngineError, EngineResult};

/// The 94 printable ASCII characters, `!` through `~`.
pub const DEFAULT_CHARSET: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
);

/// What the caller wants, and how big.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputRequest {
    /// `length` characters drawn from the configured charset.
    Password { length: usize },
    /// `bytes` output bytes rendered as `2 * bytes` lowercase hex digits.
    HexString { bytes: usize },
    /// `bytes` output bytes as a big-endian unsigned decimal, optionally
    /// zero-padded to at least `width` digits.
    Number {
        bytes: usize,
        #[serde(default)]
        width: Option<usize>,
    },
    /// `count` rolls in `min..=max` plus their sum.
    DiceRoll { count: usize, min: i64, max: i64 },
}

impl OutputRequest {
    /// Check parameters against `max_output_len` without touching entropy.
    pub fn validate(&self, max_output_len: usize) -> EngineResult<()> {
        match *self {
            Self::Password { length } => check_size("password length", length, max_output_len),
            Self::HexString { bytes } => check_size("hex byte count", bytes, max_output_len),
            Self::Number { bytes, width } => {
                check_size("number byte count", bytes, max_output_len)?;
                match width {
                    Some(w) if w > max_output_len => Err(EngineError::InvalidRequest(format!(
                        "number width {w} exceeds maximum {max_output_len}"
                    ))),
                    _ => Ok(()),
                }
            }
            Self::DiceRoll { count, min, max } => {
                dice::validate(count, min, max)?;
                if count > max_output_len {
                    return Err(EngineError::InvalidRequest(format!(
                        "dice count {count} exceeds maximum {max_output_len}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Pool bytes to withdraw for this request. Text and number outputs take
    /// a fixed `chunk_size`; dice take eight bytes per roll.
    pub fn entropy_needed(&self, chunk_size: usize) -> EngineResult<usize> {
        match *self {
            Self::DiceRoll { count, .. } => dice::bytes_needed(count).ok_or_else(|| {
                EngineError::InvalidRequest(format!("dice count {count} is too large"))
            }),
            _ => Ok(chunk_size),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::HexString { .. } => "hex",
            Self::Number { .. } => "number",
            Self::DiceRoll { .. } => "dice",
        }
    }
}

fn check_size(what: &str, size: usize, max: usize) -> EngineResult<()> {
    if size == 0 {
        return Err(EngineError::InvalidRequest(format!("{what} must be positive")));
    }
    if size > max {
        return Err(EngineError::InvalidRequest(format!(
            "{what} {size} exceeds maximum {max}"
        )));
    }
    Ok(())
}

/// Formatted result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutputValue {
    Text(String),
    Dice(DiceRoll),
}

/// A derived result plus the number of pool bytes spent on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedOutput {
    pub value: OutputValue,
    pub consumed: usize,
}

impl DerivedOutput {
    /// The formatted string, if this is not a dice roll.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            OutputValue::Text(s) => Some(s),
            OutputValue::Dice(_) => None,
        }
    }

    pub fn as_dice(&self) -> Option<&DiceRoll> {
        match &self.value {
            OutputValue::Dice(d) => Some(d),
            OutputValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for DerivedOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            OutputValue::Text(s) => f.write_str(s),
            OutputValue::Dice(d) => {
                let rolls: Vec<String> = d.rolls.iter().map(i64::to_string).collect();
                write!(f, "{} = {}", rolls.join(" + "), d.total)
            }
        }
    }
}

/// Stretches and formats withdrawn chunks.
#[derive(Debug, Clone)]
pub struct OutputDeriver {
    digest: DigestAlgorithm,
    charset: Vec<u8>,
    max_output_len: usize,
}

impl OutputDeriver {
    /// Fails with `InvalidConfig` unless `charset` is 1-256 ASCII characters.
    pub fn new(
        digest: DigestAlgorithm,
        charset: &str,
        max_output_len: usize,
    ) -> EngineResult<Self> {
        check_charset(charset)?;
        Ok(Self {
            digest,
            charset: charset.as_bytes().to_vec(),
            max_output_len,
        })
    }

    pub fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Derive `request` from `chunk`. Invalid requests are rejected before the
    /// chunk is read.
    pub fn derive(&self, request: &OutputRequest, chunk: &[u8]) -> EngineResult<DerivedOutput> {
        request.validate(self.max_output_len)?;

        let value = match *request {
            OutputRequest::Password { length } => {
                OutputValue::Text(format_password(&stretch(chunk, length, self.digest), &self.charset))
            }
            OutputRequest::HexString { bytes } => {
                OutputValue::Text(format_hex(&stretch(chunk, bytes, self.digest)))
            }
            OutputRequest::Number { bytes, width } => {
                let digits = format_decimal(&stretch(chunk, bytes, self.digest));
                OutputValue::Text(match width {
                    Some(w) => format!("{digits:0>w$}"),
                    None => digits,
                })
            }
            OutputRequest::DiceRoll { count, min, max } => {
                OutputValue::Dice(dice::roll_many(count, min, max, chunk)?)
            }
        };

        Ok(DerivedOutput {
            value,
            consumed: chunk.len(),
        })
    }
}

impl Default for OutputDeriver {
    fn default() -> Self {
        Self {
            digest: DigestAlgorithm::default(),
            charset: DEFAULT_CHARSET.as_bytes().to_vec(),
            max_output_len: 4096,
        }
    }
}

/// Password alphabets are indexed by byte, so they must be ASCII and no
/// longer than 256 characters.
pub(crate) fn check_charset(charset: &str) -> EngineResult<()> {
    if charset.is_empty() || !charset.is_ascii() || charset.len() > 256 {
        return Err(EngineError::InvalidConfig(
            "charset must be 1-256 ASCII characters".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Map each byte to `charset[b % charset.len()]`.
pub fn format_password(bytes: &[u8], charset: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| charset[b as usize % charset.len()] as char)
        .collect()
}

/// Two lowercase hex digits per byte.
pub fn format_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Render `bytes` as a big-endian unsigned integer in decimal.
pub fn format_decimal(bytes: &[u8]) -> String {
    const BASE: u64 = 1_000_000_000;

    // Little-endian limbs in base 10^9.
    let mut limbs: Vec<u32> = Vec::with_capacity(bytes.len() / 3 + 1);
    for &b in bytes {
        let mut carry = b as u64;
        for limb in limbs.iter_mut() {
            let v = (*limb as u64) * 256 + carry;
            *limb = (v % BASE) as u32;
            carry = v / BASE;
        }
        while carry > 0 {
            limbs.push((carry % BASE) as u32);
            carry /= BASE;
        }
    }

    match limbs.split_last() {
        None => "0".to_string(),
        Some((top, rest)) => {
            let mut s = top.to_string();
            for limb in rest.iter().rev() {
                let _ = write!(s, "{limb:09}");
            }
            s
        }
    }
}
