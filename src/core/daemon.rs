//! Main monitoring loop.
//!
//! One cycle: estimate process churn once, then run the scheduling and
//! classification pipeline for CPU, RAM, and IO in that fixed order, then
//! sleep until the earliest next-due check. Runs until externally
//! terminated.

use std::time::{Duration, Instant};

use super::channel::{CheckDecision, Resource, ResourceChannel};
use super::churn::ChurnTracker;
use super::config::MonitorConfig;
use super::notifier::Notifier;
use super::sampler::MetricSource;
use crate::error::Result;

pub struct Monitor<S: MetricSource> {
    source: S,
    churn: ChurnTracker,
    notifier: Notifier,
    channels: [ResourceChannel; 3],
    /// Theoretical per-core IO-wait maximum, `100 / core_count`. Computed
    /// once at startup; a reading equal to this denotes full saturation.
    io_max: f32,
}

impl<S: MetricSource> Monitor<S> {
    pub fn new(config: MonitorConfig, source: S) -> Self {
        let notifier = Notifier::new(&config);
        let churn = ChurnTracker::new(config.min_pid_similarity);
        let io_max = 100.0 / source.core_count().max(1) as f32;

        let channels = [
            ResourceChannel::new(Resource::Cpu, config.cpu),
            ResourceChannel::new(Resource::Ram, config.ram),
            ResourceChannel::new(Resource::Io, config.io),
        ];

        Self {
            source,
            churn,
            notifier,
            channels,
            io_max,
        }
    }

    /// Run forever. The only suspension point is the end-of-cycle sleep;
    /// everything inside a cycle is synchronous.
    pub fn run(&mut self) -> ! {
        loop {
            let sleep = self.run_cycle(Instant::now());
            log::info!("Sleeping for {:.1}s", sleep.as_secs_f64());
            std::thread::sleep(sleep);
        }
    }

    /// Execute one full monitoring cycle and return how long to sleep
    /// before the next one.
    pub fn run_cycle(&mut self, now: Instant) -> Duration {
        log::info!("Starting resource check");

        // Captured exactly once per cycle so all three resources see the
        // same churn verdict.
        let pids = self.source.resolvable_pids();
        let pids_same = self.churn.update(pids);

        for index in 0..self.channels.len() {
            let resource = self.channels[index].resource();
            match self.channels[index].evaluate(pids_same, now) {
                CheckDecision::Due { override_active } => match self.sample(resource) {
                    Ok(value) => {
                        log::debug!("{} usage: {:.1}", resource, value);
                        if let Some(event) =
                            self.channels[index].apply_sample(value, override_active, now)
                        {
                            self.notifier.dispatch(&event);
                        }
                    }
                    Err(e) => {
                        // A failed read skips this resource for the cycle;
                        // the loop itself must never die on it.
                        log::warn!("Skipping {} check: {}", resource, e);
                    }
                },
                CheckDecision::Skip(_) => {}
            }
        }

        log::info!("Resource check complete");
        self.sleep_time(now)
    }

    fn sample(&mut self, resource: Resource) -> Result<f32> {
        match resource {
            Resource::Cpu => self.source.cpu_percent(),
            Resource::Ram => self.source.ram_percent(),
            Resource::Io => Ok(self.source.io_wait_accum()? / self.io_max),
        }
    }

    /// Time until the earliest next-due check. Resources never yet checked
    /// contribute no wait, so the result is zero until every resource has a
    /// check on record.
    fn sleep_time(&self, now: Instant) -> Duration {
        let mut earliest: Option<Instant> = None;
        for channel in &self.channels {
            match channel.next_due() {
                Some(due) => {
                    earliest = Some(earliest.map_or(due, |e| e.min(due)));
                }
                // Never checked: already due
                None => return Duration::ZERO,
            }
        }
        match earliest {
            Some(due) => due.saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }
}
