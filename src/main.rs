use anyhow::{Context, Result};
use clap::{Arg, Command};
use colored::*;
use std::path::PathBuf;

use resalertd::core::{Monitor, SystemSampler};
use resalertd::MonitorConfig;

fn main() -> Result<()> {
    let matches = Command::new("resalertd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Monitors CPU, RAM, and IO-wait and alerts users to high usage")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to the YAML configuration file")
                .default_value("/etc/resalertd/resalertd.yaml"),
        )
        .arg(
            Arg::new("check-config")
                .long("check-config")
                .help("Validate the configuration file and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    resalertd::init_logging();

    let config_path = PathBuf::from(matches.get_one::<String>("config").unwrap());
    let config = MonitorConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

    if matches.get_flag("check-config") {
        println!(
            "{} {}",
            "Configuration OK:".green().bold(),
            config_path.display().to_string().cyan()
        );
        return Ok(());
    }

    log::info!("Configuration loaded from {:?}", config_path);
    let sampler = SystemSampler::new();
    let mut monitor = Monitor::new(config, sampler);
    monitor.run()
}
