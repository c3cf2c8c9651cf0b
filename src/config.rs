// ⚙️ Resolver Configuration
// Validated once, before any record is processed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ResolveError, ResolveResult};
use crate::scoring::MAX_SCORE;

pub const DEFAULT_MATCH_THRESHOLD: u8 = 90;
pub const DEFAULT_BLOCK_PREFIX_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Minimum pair score accepted as a match (default: 90)
    ///
    /// Kept wider than u8 so out-of-range values in a config file reach
    /// validation instead of failing as a parse error.
    pub match_threshold: u32,

    /// Characters taken from each field when building the block key (default: 3)
    pub block_prefix_length: usize,
}

impl ResolverConfig {
    /// Create config with default values
    pub fn new() -> Self {
        ResolverConfig {
            match_threshold: DEFAULT_MATCH_THRESHOLD as u32,
            block_prefix_length: DEFAULT_BLOCK_PREFIX_LENGTH,
        }
    }

    /// Load config from JSON file (missing keys fall back to defaults)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ResolverConfig = serde_json::from_str(&content)
            .context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Builder: set match threshold
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Builder: set block prefix length
    pub fn with_prefix_length(mut self, prefix_length: usize) -> Self {
        self.block_prefix_length = prefix_length;
        self
    }

    /// Reject out-of-range values
    pub fn validate(&self) -> ResolveResult<()> {
        if self.match_threshold > MAX_SCORE as u32 {
            return Err(ResolveError::InvalidThreshold(self.match_threshold));
        }
        if self.block_prefix_length == 0 {
            return Err(ResolveError::InvalidPrefixLength(self.block_prefix_length));
        }
        Ok(())
    }

    /// Threshold as a scorer value; only meaningful after `validate`
    pub fn threshold(&self) -> u8 {
        self.match_threshold.min(MAX_SCORE as u32) as u8
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
