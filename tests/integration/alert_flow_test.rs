//! End-to-end exercises of the alert decision pipeline: scheduling,
//! stability filtering, and classification across multiple cycles.

use std::time::{Duration, Instant};

use resalertd::core::{
    CheckDecision, ChurnTracker, MetricSource, Monitor, Resource, ResourceChannel, Severity,
    SkipReason,
};
use resalertd::{MonitorConfig, ResourceThresholds};

fn thresholds() -> ResourceThresholds {
    ResourceThresholds {
        warning_level: 75.0,
        critical_level: 90.0,
        stable_diff: 5.0,
        check_delay: 60.0,
        override_delay: 300.0,
    }
}

/// Run one scheduling + sampling round, panicking if the check is skipped.
fn check(channel: &mut ResourceChannel, pids_same: bool, value: f32, now: Instant) -> Option<Severity> {
    match channel.evaluate(pids_same, now) {
        CheckDecision::Due { override_active } => channel
            .apply_sample(value, override_active, now)
            .map(|event| event.severity),
        skip => panic!("expected check to run, got {:?}", skip),
    }
}

#[test]
fn test_oscillation_within_band_alerts_once() {
    let mut channel = ResourceChannel::new(Resource::Ram, thresholds());
    let t0 = Instant::now();

    // First cycle alerts and establishes the reference at 80
    assert_eq!(check(&mut channel, false, 80.0, t0), Some(Severity::Warning));

    // Usage oscillates inside the +/-5 band across later cycles: silence
    let mut t = t0;
    for value in [82.0, 78.0, 84.9, 76.0] {
        t += Duration::from_secs(61);
        assert_eq!(check(&mut channel, false, value, t), None, "value {}", value);
    }

    // Breaking out of the band re-alerts, now at critical
    t += Duration::from_secs(61);
    assert_eq!(check(&mut channel, false, 93.0, t), Some(Severity::Critical));
}

#[test]
fn test_churn_skip_ends_when_override_window_elapses() {
    let mut channel = ResourceChannel::new(Resource::Cpu, thresholds());
    let t0 = Instant::now();

    // Alert under the initial override arms the override window
    assert_eq!(check(&mut channel, true, 95.0, t0), Some(Severity::Critical));

    // While the window is open, unchanged PIDs suppress the check entirely
    let t1 = t0 + Duration::from_secs(120);
    assert_eq!(
        channel.evaluate(true, t1),
        CheckDecision::Skip(SkipReason::WorkloadUnchanged)
    );

    // Once override_delay passes, the check is forced through
    let t2 = t0 + Duration::from_secs(301);
    assert_eq!(
        channel.evaluate(true, t2),
        CheckDecision::Due {
            override_active: true
        }
    );
}

#[test]
fn test_churn_tracker_feeds_scheduling() {
    let mut churn = ChurnTracker::new(90.0);
    let mut channel = ResourceChannel::new(Resource::Io, thresholds());
    let t0 = Instant::now();

    // Cycle 1: empty previous snapshot, workload counts as changed
    let pids_same = churn.update(vec![100, 200, 300]);
    assert!(!pids_same);
    assert_eq!(check(&mut channel, pids_same, 95.0, t0), Some(Severity::Critical));

    // Cycle 2: identical snapshot, override armed by the alert above, so
    // the channel skips without sampling
    let pids_same = churn.update(vec![100, 200, 300]);
    assert!(pids_same);
    let t1 = t0 + Duration::from_secs(61);
    assert_eq!(
        channel.evaluate(pids_same, t1),
        CheckDecision::Skip(SkipReason::WorkloadUnchanged)
    );

    // Cycle 3: workload churned, routine delay already satisfied
    let pids_same = churn.update(vec![100, 900, 901]);
    assert!(!pids_same);
    let t2 = t0 + Duration::from_secs(122);
    assert_eq!(
        channel.evaluate(pids_same, t2),
        CheckDecision::Due {
            override_active: false
        }
    );
}

/// Metric source returning fixed values, for loop-level checks. CPU is
/// pinned above the critical level so the first cycle alerts and arms the
/// CPU override window.
struct ConstSource;

impl MetricSource for ConstSource {
    fn cpu_percent(&mut self) -> resalertd::Result<f32> {
        Ok(95.0)
    }

    fn ram_percent(&mut self) -> resalertd::Result<f32> {
        Ok(34.0)
    }

    fn io_wait_accum(&mut self) -> resalertd::Result<f32> {
        Ok(0.5)
    }

    fn core_count(&self) -> usize {
        8
    }

    fn resolvable_pids(&mut self) -> Vec<u32> {
        vec![1, 2, 3, 4]
    }
}

#[test]
fn test_monitor_cycle_sleep_never_negative() {
    let config = MonitorConfig {
        critical_wall_message: false,
        warning_wall_message: false,
        ..Default::default()
    };
    let mut monitor = Monitor::new(config, ConstSource);

    // Cycle 1: everything checked at t0; the CPU alert arms its override
    // window, so a full check delay remains
    let t0 = Instant::now();
    let sleep = monitor.run_cycle(t0);
    assert_eq!(sleep, Duration::from_secs(60));

    // Cycle 2, 120s later: the PID list is identical and the CPU override
    // window is still open, so the CPU check is skipped and its next-due
    // time (t0 + 60s) stays in the past. The sleep clamps to zero rather
    // than going negative.
    let sleep = monitor.run_cycle(t0 + Duration::from_secs(120));
    assert_eq!(sleep, Duration::ZERO);
}
