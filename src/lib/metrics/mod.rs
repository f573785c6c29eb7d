mod sysinfo_source;

use std::path::{Path, PathBuf};

pub use sysinfo_source::SysinfoSource;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no CPU information available")]
    NoCpu,

    #[error("total memory reported as zero")]
    NoMemory,

    #[error("no disk mounted at {0:?}")]
    DiskNotFound(PathBuf),

    #[error("disk mounted at {0:?} reports zero capacity")]
    EmptyDisk(PathBuf),
}

/// Point-in-time utilization readings, in percent.
///
/// Every call may fail on its own; a failure of one metric says nothing about
/// the others.
pub trait MetricsSource {
    fn sample_cpu(&mut self) -> Result<f64>;

    fn sample_memory(&mut self) -> Result<f64>;

    fn sample_disk(&mut self, path: &Path) -> Result<f64>;
}

pub(crate) fn used_percent(used: u64, total: u64) -> f64 {
    (used as f64 / total as f64) * 100.0
}
