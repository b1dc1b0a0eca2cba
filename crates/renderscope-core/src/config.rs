//! Tracker and diagnostics configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [tracker]
//! window_size = 10
//! excessive_render_threshold = 10
//! start_enabled = true
//!
//! [diagnostics]
//! render_count_wait_ms = 3000
//! memory_wait_ms = 5000
//! performance_wait_ms = 2000
//! memory_budget_bytes = 10485760
//! frame_budget_ms = 16.0
//! unavailable_memory = "inconclusive"
//! ```

use crate::error::ConfigError;
use crate::metrics::DEFAULT_EXCESSIVE_RENDER_THRESHOLD;
use crate::window::DEFAULT_WINDOW_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the [`RenderTracker`](crate::RenderTracker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Intervals kept per component for the moving average
    pub window_size: usize,
    /// Render count above which a component is excessive
    pub excessive_render_threshold: u64,
    /// Whether tracking is on as soon as the tracker is built
    pub start_enabled: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            excessive_render_threshold: DEFAULT_EXCESSIVE_RENDER_THRESHOLD,
            start_enabled: true,
        }
    }
}

/// Outcome of the memory check when the host cannot report memory usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableMemoryPolicy {
    /// Report the check as inconclusive
    #[default]
    Inconclusive,
    /// Report the check as passed
    Pass,
}

/// Waits and thresholds for the [`Diagnostics`](crate::Diagnostics) runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Wait before checking render counts
    pub render_count_wait_ms: u64,
    /// Wait between the two memory readings
    pub memory_wait_ms: u64,
    /// Wait before checking the average render interval
    pub performance_wait_ms: u64,
    /// Largest memory growth that still passes
    pub memory_budget_bytes: u64,
    /// Largest average render interval that still passes (exclusive)
    pub frame_budget_ms: f64,
    /// What to report when memory usage is unavailable
    pub unavailable_memory: UnavailableMemoryPolicy,
}

impl DiagnosticsConfig {
    /// 10 MiB.
    pub const DEFAULT_MEMORY_BUDGET_BYTES: u64 = 10 * 1024 * 1024;
    /// One frame at 60fps, rounded down.
    pub const DEFAULT_FRAME_BUDGET_MS: f64 = 16.0;
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            render_count_wait_ms: 3000,
            memory_wait_ms: 5000,
            performance_wait_ms: 2000,
            memory_budget_bytes: Self::DEFAULT_MEMORY_BUDGET_BYTES,
            frame_budget_ms: Self::DEFAULT_FRAME_BUDGET_MS,
            unavailable_memory: UnavailableMemoryPolicy::default(),
        }
    }
}

/// Top-level renderscope configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tracker settings
    pub tracker: TrackerConfig,
    /// Diagnostics settings
    pub diagnostics: DiagnosticsConfig,
}

impl Config {
    /// Default config file name.
    pub const CONFIG_FILE: &'static str = "renderscope.toml";

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the config as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a config file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker.window_size == 0 {
            return Err(ConfigError::Invalid(
                "tracker.window_size must be at least 1".to_string(),
            ));
        }
        let budget = self.diagnostics.frame_budget_ms;
        if !budget.is_finite() || budget <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "diagnostics.frame_budget_ms must be a positive number, got {budget}"
            )));
        }
        Ok(())
    }
}
