use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_CAPTIONS: usize = 5;
pub const DEFAULT_TIMEOUT_MS: u64 = 500;

/// fixed for the lifetime of a buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// how many sources may have text on screen at once
    pub max_captions: usize,
    /// how long a caption stays up without a new event from its source
    pub timeout_ms: u64,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            max_captions: DEFAULT_MAX_CAPTIONS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl CaptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_captions == 0 {
            bail!("max_captions must be at least 1");
        }
        if self.timeout_ms == 0 {
            bail!("timeout_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
