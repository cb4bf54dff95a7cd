//! Per-resource alert decision engine.
//!
//! One [`ResourceChannel`] exists per monitored resource and owns that
//! resource's thresholds and mutable state. Scheduling (is a check due?) and
//! classification (is the value stable, warning, critical?) both live here,
//! so CPU, RAM, and IO are handled by the same code path and cannot read
//! each other's thresholds or timestamps.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::config::ResourceThresholds;

/// Elapsed/delay ratio above which a check counts as due. Slightly under 1.0
/// so sleep/wake jitter of a few milliseconds cannot perpetually delay checks.
const CHECK_DUE_RATIO: f64 = 0.95;

/// A monitored resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    Cpu,
    Ram,
    Io,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Cpu => write!(f, "CPU"),
            Resource::Ram => write!(f, "RAM"),
            Resource::Io => write!(f, "IO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "Warning"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

/// An individual alert, consumed immediately by the notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub resource: Resource,
    pub severity: Severity,
    pub value: f32,
    pub timestamp: i64, // Unix timestamp
}

/// Outcome of the per-cycle scheduling decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckDecision {
    /// Sample the resource this cycle. `override_active` feeds the
    /// stability filter and the override-window reset.
    Due { override_active: bool },
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// PID lists are highly similar and no override is active.
    WorkloadUnchanged,
    /// Not enough time has passed since the last check.
    DelayNotElapsed,
}

/// Mutable per-resource state, created unset at daemon start.
#[derive(Debug, Default)]
struct ResourceState {
    last_check: Option<Instant>,
    last_override: Option<Instant>,
    /// Last value that triggered an alert. Never set by a normal reading.
    stable_ref: Option<f32>,
}

/// One monitored resource: thresholds plus lifetime state.
#[derive(Debug)]
pub struct ResourceChannel {
    resource: Resource,
    thresholds: ResourceThresholds,
    state: ResourceState,
}

impl ResourceChannel {
    pub fn new(resource: Resource, thresholds: ResourceThresholds) -> Self {
        Self {
            resource,
            thresholds,
            state: ResourceState::default(),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Decide whether this resource should be sampled this cycle.
    ///
    /// Does not mutate state; `apply_sample` records the check time once a
    /// sample has actually been taken.
    pub fn evaluate(&self, pids_same: bool, now: Instant) -> CheckDecision {
        let override_active = match self.state.last_override {
            None => {
                log::info!(
                    "{} usage has never been checked by this instance: check override activated",
                    self.resource
                );
                true
            }
            Some(last) => {
                let elapsed = now.duration_since(last).as_secs_f64();
                log::debug!(
                    "Time since last {} check override: {:.1}s (override delay: {:.1}s)",
                    self.resource,
                    elapsed,
                    self.thresholds.override_delay
                );
                if elapsed >= self.thresholds.override_delay {
                    log::info!(
                        "Time since last override exceeds {} override delay: check override activated",
                        self.resource
                    );
                    true
                } else {
                    false
                }
            }
        };

        if !override_active && pids_same {
            log::info!(
                "PIDs are highly similar to last check and no {} override is active: skipping check",
                self.resource
            );
            return CheckDecision::Skip(SkipReason::WorkloadUnchanged);
        }

        let due = match self.state.last_check {
            None => {
                log::info!("{} usage never checked: checking now", self.resource);
                true
            }
            Some(_) if override_active => {
                log::info!("{} check override active: checking now", self.resource);
                true
            }
            Some(last) => {
                let elapsed = now.duration_since(last).as_secs_f64();
                let ratio = elapsed / self.thresholds.check_delay;
                log::debug!(
                    "Time since last {} check: {:.1}s (check delay: {:.1}s)",
                    self.resource,
                    elapsed,
                    self.thresholds.check_delay
                );
                ratio >= CHECK_DUE_RATIO
            }
        };

        if due {
            CheckDecision::Due { override_active }
        } else {
            log::info!(
                "Time since last check is not close to the {} check delay: skipping check",
                self.resource
            );
            CheckDecision::Skip(SkipReason::DelayNotElapsed)
        }
    }

    /// Feed a sampled value through the stability filter and threshold
    /// classifier. Records the check time unconditionally and returns an
    /// alert when the value is unstable and crosses a threshold.
    pub fn apply_sample(
        &mut self,
        value: f32,
        override_active: bool,
        now: Instant,
    ) -> Option<AlertEvent> {
        let stable = match self.state.stable_ref {
            None => false,
            Some(_) if override_active => false,
            Some(reference) => (value - reference).abs() <= self.thresholds.stable_diff,
        };

        let event = if stable {
            log::debug!(
                "{} usage has not changed significantly since last alert: suppressing",
                self.resource
            );
            None
        } else if value >= self.thresholds.critical_level {
            self.alert(value, Severity::Critical, override_active, now)
        } else if value >= self.thresholds.warning_level {
            self.alert(value, Severity::Warning, override_active, now)
        } else {
            // Sub-threshold readings never move the stability reference;
            // fluctuation that stays below warning keeps being compared
            // against the last alerted value.
            log::debug!(
                "{} usage is not above warning or critical threshold: no alert",
                self.resource
            );
            None
        };

        self.state.last_check = Some(now);
        event
    }

    fn alert(
        &mut self,
        value: f32,
        severity: Severity,
        override_active: bool,
        now: Instant,
    ) -> Option<AlertEvent> {
        self.state.stable_ref = Some(value);
        if override_active {
            // Restart the override window from this alert so it does not
            // re-fire every subsequent cycle.
            self.state.last_override = Some(now);
            log::debug!("Reset last {} check override time", self.resource);
        }
        Some(AlertEvent {
            resource: self.resource,
            severity,
            value,
            timestamp: chrono::Utc::now().timestamp(),
        })
    }

    /// When the next routine check is due, if one has happened.
    pub fn next_due(&self) -> Option<Instant> {
        self.state
            .last_check
            .map(|last| last + std::time::Duration::from_secs_f64(self.thresholds.check_delay))
    }
}
