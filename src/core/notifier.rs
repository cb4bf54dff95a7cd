//! Alert notification: severity-matched logging and optional `wall`
//! broadcast to all logged-in sessions.

use std::process::Command;

use super::channel::{AlertEvent, Severity};
use super::config::MonitorConfig;

/// Dispatches alert events. Broadcast availability is probed once at
/// construction; a missing `wall` binary disables broadcasting for the
/// process lifetime.
#[derive(Debug)]
pub struct Notifier {
    wall_warning: bool,
    wall_critical: bool,
}

impl Notifier {
    pub fn new(config: &MonitorConfig) -> Self {
        let wall_available = which::which("wall").is_ok();
        if wall_available {
            log::debug!("Program \"wall\" found");
        } else {
            log::debug!("Program \"wall\" not found: broadcasts disabled");
        }

        let wall_critical = wall_available && config.critical_wall_message;
        let wall_warning = wall_available && config.warning_wall_message;
        log::debug!(
            "Critical broadcasts {}, warning broadcasts {}",
            if wall_critical { "enabled" } else { "disabled" },
            if wall_warning { "enabled" } else { "disabled" },
        );

        Self {
            wall_warning,
            wall_critical,
        }
    }

    /// Log the alert at its severity and broadcast it when enabled.
    pub fn dispatch(&self, event: &AlertEvent) {
        let message = alert_message(event);
        match event.severity {
            Severity::Warning => log::warn!("{}", message),
            Severity::Critical => log::error!("{}", message),
        }

        let broadcast = match event.severity {
            Severity::Warning => self.wall_warning,
            Severity::Critical => self.wall_critical,
        };
        if broadcast {
            self.wall(event);
        }
    }

    /// Run `wall` with the composed message. Failure is logged and never
    /// propagates; the next cycle is unaffected.
    fn wall(&self, event: &AlertEvent) {
        log::info!("Attempting broadcast");
        match Command::new("wall").arg(wall_message(event)).status() {
            Ok(status) if status.success() => log::info!("Broadcast successful"),
            Ok(status) => log::error!("Broadcast via \"wall\" exited with {}", status),
            Err(e) => log::error!("Cannot send broadcast via the program \"wall\": {}", e),
        }
    }
}

/// Log line for an alert: `{Resource} Usage {Severity}: {value}`.
pub fn alert_message(event: &AlertEvent) -> String {
    format!(
        "{} Usage {}: {:.1}",
        event.resource, event.severity, event.value
    )
}

/// Broadcast text: the log line plus advice for logged-in users.
pub fn wall_message(event: &AlertEvent) -> String {
    format!(
        "{}\nIt is recommended that you do not start any {} intensive processes at this time.",
        alert_message(event),
        event.resource
    )
}
