//! Daemon configuration loaded once at startup.
//!
//! Thresholds, debounce bands, and check cadence are configurable per
//! resource; broadcast toggles and the PID-similarity cutoff are global.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AlerterError, Result};

/// Thresholds and timing for a single monitored resource.
///
/// All levels are percentages; delays are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceThresholds {
    pub warning_level: f32,  // Warning threshold (%)
    pub critical_level: f32, // Critical threshold (%)
    /// Band around the last alerted value inside which new readings are
    /// considered stable and re-alerting is suppressed.
    pub stable_diff: f32,
    /// Minimum seconds between routine checks of this resource.
    pub check_delay: f64,
    /// Seconds after which a forced re-check bypasses the churn skip.
    pub override_delay: f64,
}

impl Default for ResourceThresholds {
    fn default() -> Self {
        Self {
            warning_level: 75.0,
            critical_level: 90.0,
            stable_diff: 5.0,
            check_delay: 60.0,
            override_delay: 300.0,
        }
    }
}

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub cpu: ResourceThresholds,
    #[serde(default)]
    pub ram: ResourceThresholds,
    #[serde(default)]
    pub io: ResourceThresholds,
    /// PID-list similarity (0-100) above which the workload is treated as
    /// unchanged and routine checks are skipped.
    #[serde(default = "default_min_pid_similarity")]
    pub min_pid_similarity: f32,
    /// Broadcast critical alerts to logged-in sessions via `wall`.
    #[serde(default = "default_true")]
    pub critical_wall_message: bool,
    /// Broadcast warning alerts to logged-in sessions via `wall`.
    #[serde(default)]
    pub warning_wall_message: bool,
}

fn default_min_pid_similarity() -> f32 {
    90.0
}

fn default_true() -> bool {
    true
}

impl MonitorConfig {
    /// Load and validate configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: MonitorConfig = serde_yaml::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check all invariants the alert engine relies on.
    pub fn validate(&self) -> Result<()> {
        for (name, res) in [("cpu", &self.cpu), ("ram", &self.ram), ("io", &self.io)] {
            // NaN compares false against everything, so every threshold has
            // to be pinned finite before the ordering checks mean anything.
            for (field, value) in [
                ("warning_level", res.warning_level as f64),
                ("critical_level", res.critical_level as f64),
                ("stable_diff", res.stable_diff as f64),
                ("check_delay", res.check_delay),
                ("override_delay", res.override_delay),
            ] {
                if !value.is_finite() {
                    return Err(AlerterError::config(format!(
                        "{}: {} must be a finite number, got {}",
                        name, field, value
                    )));
                }
            }
            if res.critical_level < res.warning_level {
                return Err(AlerterError::config(format!(
                    "{}: critical_level ({}) must be >= warning_level ({})",
                    name, res.critical_level, res.warning_level
                )));
            }
            if res.stable_diff < 0.0 {
                return Err(AlerterError::config(format!(
                    "{}: stable_diff must be >= 0, got {}",
                    name, res.stable_diff
                )));
            }
            if res.check_delay <= 0.0 {
                return Err(AlerterError::config(format!(
                    "{}: check_delay must be > 0 seconds, got {}",
                    name, res.check_delay
                )));
            }
            if res.override_delay <= 0.0 {
                return Err(AlerterError::config(format!(
                    "{}: override_delay must be > 0 seconds, got {}",
                    name, res.override_delay
                )));
            }
        }
        if !self.min_pid_similarity.is_finite() {
            return Err(AlerterError::config(format!(
                "min_pid_similarity must be a finite number, got {}",
                self.min_pid_similarity
            )));
        }
        if !(0.0..=100.0).contains(&self.min_pid_similarity) {
            return Err(AlerterError::config(format!(
                "min_pid_similarity must be in [0, 100], got {}",
                self.min_pid_similarity
            )));
        }
        Ok(())
    }
}
