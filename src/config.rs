use crate::errors::{Result, TranslatorError};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

const MIN_RETRY_DELAY_MS: u64 = 50;
const MIN_WATCHDOG_INTERVAL_MS: u64 = 100;

/// Timings for the startup sequence and the container watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuntimeConfig {
    /// Wait after the document is ready before the first full scan, so the
    /// host can populate its message backlog.
    #[serde(default = "default_startup_delay")]
    pub startup_delay_ms: u64,
    /// Delay between container lookups while none is found.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_watchdog_interval")]
    pub watchdog_interval_ms: u64,
}

fn default_startup_delay() -> u64 {
    2000
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_watchdog_interval() -> u64 {
    5000
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: default_startup_delay(),
            retry_delay_ms: default_retry_delay(),
            watchdog_interval_ms: default_watchdog_interval(),
        }
    }
}

impl RuntimeConfig {
    /// Load config from file, or fall back to defaults if it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RuntimeConfig =
            serde_json::from_str(&content).map_err(|e| TranslatorError::Config(e.to_string()))?;
        Ok(config.clamped())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn clamped(mut self) -> Self {
        if self.retry_delay_ms < MIN_RETRY_DELAY_MS {
            self.retry_delay_ms = MIN_RETRY_DELAY_MS;
        }
        if self.watchdog_interval_ms < MIN_WATCHDOG_INTERVAL_MS {
            self.watchdog_interval_ms = MIN_WATCHDOG_INTERVAL_MS;
        }
        self
    }
}
