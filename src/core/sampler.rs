//! Metric sources for the monitor.
//!
//! The engine consumes metrics through the [`MetricSource`] trait so the
//! decision logic stays portable and testable; [`SystemSampler`] is the
//! production implementation built on sysinfo plus `/proc` reads.

use std::fs;
use std::path::Path;

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::error::{AlerterError, Result};

/// Synchronous, side-effect-free reads of current system utilization.
pub trait MetricSource {
    /// Current CPU utilization in [0, 100].
    fn cpu_percent(&mut self) -> Result<f32>;

    /// Current RAM utilization in [0, 100].
    fn ram_percent(&mut self) -> Result<f32>;

    /// Accumulated IO-wait time in seconds since boot.
    fn io_wait_accum(&mut self) -> Result<f32>;

    /// Number of logical cores.
    fn core_count(&self) -> usize;

    /// Live process IDs whose executable path resolves, in ascending PID
    /// order. Kernel tasks and processes that vanish between enumeration
    /// and resolution are silently excluded.
    fn resolvable_pids(&mut self) -> Vec<u32>;
}

/// Production metric source.
pub struct SystemSampler {
    system: System,
}

impl SystemSampler {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());
        let mut system = System::new_with_specifics(refresh_kind);

        // The first CPU reading after creation is meaningless; prime the
        // counters so the first real check sees a valid delta.
        system.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu_usage();

        Self { system }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for SystemSampler {
    fn cpu_percent(&mut self) -> Result<f32> {
        self.system.refresh_cpu_usage();
        let usage = self.system.global_cpu_usage();
        if !usage.is_finite() {
            return Err(AlerterError::metric_read(format!(
                "CPU usage reading is not finite: {}",
                usage
            )));
        }
        Ok(usage)
    }

    fn ram_percent(&mut self) -> Result<f32> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(AlerterError::metric_read("total memory reported as 0"));
        }
        Ok((self.system.used_memory() as f32 / total as f32) * 100.0)
    }

    fn io_wait_accum(&mut self) -> Result<f32> {
        read_iowait_seconds(Path::new("/proc/stat"))
    }

    fn core_count(&self) -> usize {
        self.system.cpus().len()
    }

    fn resolvable_pids(&mut self) -> Vec<u32> {
        list_resolvable_pids(Path::new("/proc"))
    }
}

/// Parse accumulated IO-wait seconds from a `/proc/stat`-format file.
///
/// The aggregate `cpu` line reports jiffies; field 5 (0-based) is iowait.
fn read_iowait_seconds(stat_path: &Path) -> Result<f32> {
    let content = fs::read_to_string(stat_path)?;
    let cpu_line = content
        .lines()
        .find(|line| line.starts_with("cpu "))
        .ok_or_else(|| AlerterError::metric_read("no aggregate cpu line in /proc/stat"))?;

    let iowait_ticks: f64 = cpu_line
        .split_whitespace()
        .nth(5)
        .ok_or_else(|| AlerterError::metric_read("cpu line too short for iowait field"))?
        .parse()
        .map_err(|e| AlerterError::metric_read(format!("bad iowait field: {}", e)))?;

    Ok((iowait_ticks / clock_ticks_per_second()) as f32)
}

/// Kernel USER_HZ, 100 on every mainstream Linux ABI.
fn clock_ticks_per_second() -> f64 {
    #[cfg(unix)]
    {
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if ticks > 0 {
            return ticks as f64;
        }
    }
    100.0
}

/// Scan a `/proc`-format directory for numeric entries whose `exe` link can
/// be read. Kernel tasks report ENOENT from readlink, and a process exiting
/// mid-scan loses its entry; both are expected and skipped without logging.
fn list_resolvable_pids(proc_root: &Path) -> Vec<u32> {
    let entries = match fs::read_dir(proc_root) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot enumerate {}: {}", proc_root.display(), e);
            return Vec::new();
        }
    };

    let mut pids: Vec<u32> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
        .filter(|pid| fs::read_link(proc_root.join(pid.to_string()).join("exe")).is_ok())
        .collect();
    pids.sort_unstable();
    pids
}
