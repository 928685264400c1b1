//! Start-time engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conditioning::DigestAlgorithm;
use crate::error::{EngineError, EngineResult};
use crate::output::{DEFAULT_CHARSET, check_charset};

/// Engine constants. Fixed once the engine is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum bytes held by the pool.
    pub pool_capacity: usize,
    /// Bins per sample frame. Frames of any other length are not admitted.
    pub frame_size: usize,
    /// Frames scoring at or below this are discarded.
    pub quality_threshold: f64,
    /// Digest used to stretch withdrawn chunks.
    pub digest: DigestAlgorithm,
    /// Password alphabet.
    pub charset: String,
    /// Pool bytes withdrawn per password, hex or number request.
    pub chunk_size: usize,
    /// Largest accepted output length, in characters, bytes or dice.
    pub max_output_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 4096,
            frame_size: 128,
            quality_threshold: 2.0,
            digest: DigestAlgorithm::Sha256,
            charset: DEFAULT_CHARSET.to_string(),
            chunk_size: 32,
            max_output_len: 4096,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            EngineError::InvalidConfig(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

        if self.pool_capacity == 0 {
            return invalid("pool_capacity must be positive".into());
        }
        if self.frame_size == 0 {
            return invalid("frame_size must be positive".into());
        }
        if self.chunk_size == 0 {
            return invalid("chunk_size must be positive".into());
        }
        if self.chunk_size > self.pool_capacity {
            return invalid(format!(
                "chunk_size {} exceeds pool_capacity {}",
                self.chunk_size, self.pool_capacity
            ));
        }
        if self.max_output_len == 0 {
            return invalid("max_output_len must be positive".into());
        }
        if !self.quality_threshold.is_finite() || self.quality_threshold < 0.0 {
            return invalid(format!(
                "quality_threshold must be a non-negative number, got {}",
                self.quality_threshold
            ));
        }
        check_charset(&self.charset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_size, 128);
        assert_eq!(config.pool_capacity, 4096);
        assert_eq!(config.charset.len(), 94);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            EngineConfig { pool_capacity: 0, ..Default::default() },
            EngineConfig { frame_size: 0, ..Default::default() },
            EngineConfig { chunk_size: 0, ..Default::default() },
            EngineConfig { chunk_size: 8192, ..Default::default() },
            EngineConfig { max_output_len: 0, ..Default::default() },
            EngineConfig { quality_threshold: -1.0, ..Default::default() },
            EngineConfig { quality_threshold: f64::NAN, ..Default::default() },
            EngineConfig { charset: String::new(), ..Default::default() },
            EngineConfig { charset: "abcé".into(), ..Default::default() },
            EngineConfig { charset: "a".repeat(257), ..Default::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(EngineError::InvalidConfig(_))),
                "expected rejection for {config:?}"
            );
        }
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pool_capacity": 512, "digest": "sha512"}}"#).unwrap();
        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.pool_capacity, 512);
        assert_eq!(config.digest, DigestAlgorithm::Sha512);
        assert_eq!(config.frame_size, 128);
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"frame_size": 0}}"#).unwrap();
        assert!(EngineConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_json_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_json_garbage_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(EngineConfig::from_json_file(file.path()).is_err());
    }
}
