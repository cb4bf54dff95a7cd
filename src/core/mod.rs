// Core business logic module

pub mod channel;
pub mod churn;
pub mod config;
pub mod daemon;
pub mod notifier;
pub mod sampler;

// Re-export commonly used items
pub use channel::{AlertEvent, CheckDecision, Resource, ResourceChannel, Severity, SkipReason};
pub use churn::ChurnTracker;
pub use config::{MonitorConfig, ResourceThresholds};
pub use daemon::Monitor;
pub use notifier::Notifier;
pub use sampler::{MetricSource, SystemSampler};
