//! Entropy conditioning: pairwise whitening on the way in, hash stretching on
//! the way out.
//!
//! # Architecture
//!
//! ```text
//! Frame → whiten → Pool → withdraw → stretch → format
//! ```
//!
//! All byte transformations live here so the pool and the formatters never
//! touch raw samples or digests directly.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

/// Digest used for stretching withdrawn chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256 (default). 32 bytes per block.
    #[default]
    Sha256,
    /// SHA-512. 64 bytes per block.
    Sha512,
}

impl DigestAlgorithm {
    /// Bytes produced per counter step.
    pub fn block_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            other => Err(format!("unknown digest algorithm '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Whitening
// ---------------------------------------------------------------------------

/// Pairwise debiasing of a sample frame.
///
/// Walks adjacent, non-overlapping pairs `(b1, b2)` and keeps `b1` unless the
/// pair is equal (stuck bin) or `b1` is zero (silent bin). A trailing
/// unpaired byte is dropped. Output length is at most `frame.len() / 2` and
/// every output byte is taken from the frame unchanged.
pub fn whiten(frame: &[u8]) -> Vec<u8> {
    frame
        .chunks_exact(2)
        .filter_map(|pair| {
            let (b1, b2) = (pair[0], pair[1]);
            if b1 == b2 || b1 == 0 { None } else { Some(b1) }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stretching
// ---------------------------------------------------------------------------

/// Counter-mode expansion of `chunk` to exactly `n_output` bytes.
///
/// Block `i` is `H(chunk || decimal(i))` with `i` counting up from zero.
/// The result depends only on `chunk`, `n_output` and the algorithm.
pub fn stretch(chunk: &[u8], n_output: usize, algorithm: DigestAlgorithm) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha256 => stretch_with::<Sha256>(chunk, n_output),
        DigestAlgorithm::Sha512 => stretch_with::<Sha512>(chunk, n_output),
    }
}

fn stretch_with<D: Digest>(chunk: &[u8], n_output: usize) -> Vec<u8> {
    let block = <D as Digest>::output_size();
    let mut output = Vec::with_capacity(n_output.div_ceil(block) * block);
    let mut counter: u64 = 0;
    while output.len() < n_output {
        let mut h = D::new();
        h.update(chunk);
        h.update(counter.to_string().as_bytes());
        output.extend_from_slice(&h.finalize());
        counter += 1;
    }
    output.truncate(n_output);
    output
}
