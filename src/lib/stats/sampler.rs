use std::{
    io::{BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use tokio::time::{Instant, MissedTickBehavior};
use tracing::*;

use crate::{
    metrics::{self, MetricsSource},
    shutdown::Shutdown,
};

use super::snapshot::{Metric, SnapshotWriter};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
/// Longest period the ticker can schedule without overflowing its deadlines.
pub const MAX_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Periodically samples a [`MetricsSource`] into the snapshot store and the
/// metric log.
pub struct Sampler<S, W: Write> {
    source: S,
    snapshot: SnapshotWriter,
    sink: BufWriter<W>,
    disk_path: PathBuf,
    interval: Duration,
}

impl<S, W> Sampler<S, W>
where
    S: MetricsSource,
    W: Write,
{
    pub fn new(
        source: S,
        snapshot: SnapshotWriter,
        sink: W,
        disk_path: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            snapshot,
            sink: BufWriter::new(sink),
            disk_path: disk_path.into(),
            interval: usable_interval(interval),
        }
    }

    /// Tick every interval until the shutdown fires, then flush and close the sink.
    ///
    /// The first tick happens one interval after the call. Ticks missed while a
    /// slow one runs are skipped, never bursted.
    #[instrument(level = "debug", skip_all)]
    pub async fn run(mut self, shutdown: Shutdown) {
        debug!("Sampling every {:?}", self.interval);

        let mut period = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        period.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = period.tick() => self.tick(),
            }
        }

        if let Err(error) = self.sink.flush() {
            error!("Failed flushing the metric log: {error}");
        }
        debug!("Sampler stopped");
    }

    /// Sample every metric once, then flush the sink.
    pub fn tick(&mut self) {
        for metric in Metric::ALL {
            let result = match metric {
                Metric::Cpu => self.source.sample_cpu(),
                Metric::Memory => self.source.sample_memory(),
                Metric::Disk => self.source.sample_disk(&self.disk_path),
            };
            self.record(metric, result);
        }

        if let Err(error) = self.sink.flush() {
            error!("Failed flushing the metric log: {error}");
        }
    }

    fn record(&mut self, metric: Metric, result: metrics::Result<f64>) {
        match result {
            Ok(value) => {
                let line = usage_line(metric, value);
                info!("{}", line.trim_end());
                self.write_line(&line);
                self.snapshot.update(metric, value);
            }
            Err(error) => {
                let line = error_line(metric, &error);
                warn!("{}", line.trim_end());
                self.write_line(&line);
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        if let Err(error) = self.sink.write_all(line.as_bytes()) {
            error!("Failed writing to the metric log: {error}");
        }
    }
}

/// A zero period can't tick and one above [`MAX_INTERVAL`] overflows the ticker,
/// both fall back to [`DEFAULT_INTERVAL`].
fn usable_interval(interval: Duration) -> Duration {
    if interval.is_zero() || interval > MAX_INTERVAL {
        warn!("Unusable sampling interval {interval:?}, using default: {DEFAULT_INTERVAL:?}");
        return DEFAULT_INTERVAL;
    }

    interval
}

pub fn usage_line(metric: Metric, value: f64) -> String {
    format!("{metric} Usage: {value}%\n")
}

pub fn error_line(metric: Metric, error: &impl std::fmt::Display) -> String {
    format!("Error getting {}: {error}\n", metric.failure_subject())
}
