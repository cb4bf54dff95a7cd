// resalertd library - public API

// Re-export error types
pub mod error;
pub use error::{AlerterError, Result};

// Module declarations
pub mod core;

// Re-export commonly used types
pub use core::config::{MonitorConfig, ResourceThresholds};
pub use core::{Monitor, Resource, Severity};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
