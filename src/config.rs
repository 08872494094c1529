//! Decoder limits.
//!
//! The defaults are safe for untrusted network input. Embedders that load their own
//! settings can deserialize a [`DecoderConfig`] from TOML:
//!
//! ```toml
//! max_depth = 256
//! max_entries = 65536
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deepest List/Compound nesting accepted by default.
///
/// Decoding recurses once per level. At this depth a debug build needs roughly 1 MiB
/// of stack, which fits the 2 MiB Rust gives spawned threads. Lower `max_depth` when
/// decoding on a smaller stack.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Most children accepted in a single List or Compound by default.
pub const DEFAULT_MAX_ENTRIES: usize = (i32::MAX / 4) as usize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Ceilings applied while decoding or walking NBT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum nesting of List/Compound tags; the root compound is level 1.
    pub max_depth: usize,
    /// Maximum children in one List or Compound.
    pub max_entries: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl DecoderConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DecoderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".to_string()));
        }
        if self.max_entries == 0 {
            return Err(ConfigError::Invalid("max_entries must be at least 1".to_string()));
        }
        Ok(())
    }
}
