//! Sample frames and the quality gate.
//!
//! A [`SampleFrame`] is one tick of frequency-bin magnitudes handed over by the
//! audio collaborator. [`score`] measures how much the bins disagree with each
//! other: a silent or flat signal scores near zero and is rejected before it
//! can reach the pool.

/// One tick of unsigned byte magnitudes, one per frequency bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFrame {
    bins: Vec<u8>,
}

impl SampleFrame {
    pub fn new(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

impl From<Vec<u8>> for SampleFrame {
    fn from(bins: Vec<u8>) -> Self {
        Self::new(bins)
    }
}

impl From<&[u8]> for SampleFrame {
    fn from(bins: &[u8]) -> Self {
        Self::new(bins.to_vec())
    }
}

impl AsRef<[u8]> for SampleFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bins
    }
}

/// Population standard deviation of the frame's byte values.
///
/// Divides by N, not N-1. Returns 0.0 for an empty frame.
pub fn score(frame: &[u8]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let n = frame.len() as f64;
    let mean = frame.iter().map(|&b| b as f64).sum::<f64>() / n;
    let variance = frame
        .iter()
        .map(|&b| {
            let d = b as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Admission rule: only frames scoring strictly above `threshold` pass.
pub fn passes(score: f64, threshold: f64) -> bool {
    score > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_empty_is_zero() {
        assert_eq!(score(&[]), 0.0);
    }

    #[test]
    fn test_score_flat_signal_is_zero() {
        assert_eq!(score(&[77u8; 128]), 0.0);
    }

    #[test]
    fn test_score_uses_population_variance() {
        // mean 5, squared deviations 9+1+1+9 = 20, /4 = 5
        let s = score(&[2, 4, 6, 8]);
        assert!((s - 5.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_score_two_extremes() {
        let s = score(&[0, 255]);
        assert!((s - 127.5).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(!passes(2.0, 2.0));
        assert!(passes(2.0001, 2.0));
        assert!(!passes(0.0, 0.0));
    }

    #[test]
    fn test_frame_conversions() {
        let frame = SampleFrame::from(&[1u8, 2, 3][..]);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.as_bytes(), &[1, 2, 3]);
        assert!(!frame.is_empty());
        assert!(SampleFrame::new(Vec::new()).is_empty());
    }
}
