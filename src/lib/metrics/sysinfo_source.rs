use std::path::Path;

use sysinfo::{CpuExt, DiskExt, System, SystemExt};
use tracing::*;

use super::{used_percent, Error, MetricsSource, Result};

/// [`MetricsSource`] backed by `sysinfo`.
///
/// The same [`System`] is kept between calls, so the CPU reading is the usage
/// since the previous [`MetricsSource::sample_cpu`]. The first one is usually 0.
pub struct SysinfoSource {
    system: System,
}

impl std::fmt::Debug for SysinfoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysinfoSource").finish_non_exhaustive()
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    #[instrument(level = "debug")]
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        system.refresh_disks_list();

        Self { system }
    }
}

impl MetricsSource for SysinfoSource {
    #[instrument(level = "trace", skip(self))]
    fn sample_cpu(&mut self) -> Result<f64> {
        self.system.refresh_cpu();

        if self.system.cpus().is_empty() {
            return Err(Error::NoCpu);
        }

        Ok(self.system.global_cpu_info().cpu_usage() as f64)
    }

    #[instrument(level = "trace", skip(self))]
    fn sample_memory(&mut self) -> Result<f64> {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        if total == 0 {
            return Err(Error::NoMemory);
        }

        Ok(used_percent(self.system.used_memory(), total))
    }

    #[instrument(level = "trace", skip(self))]
    fn sample_disk(&mut self, path: &Path) -> Result<f64> {
        // Disks can be mounted and unmounted while we run
        self.system.refresh_disks_list();
        self.system.refresh_disks();

        let disk = self
            .system
            .disks()
            .iter()
            .find(|disk| disk.mount_point() == path)
            .ok_or_else(|| Error::DiskNotFound(path.to_path_buf()))?;

        let total = disk.total_space();
        if total == 0 {
            return Err(Error::EmptyDisk(path.to_path_buf()));
        }

        let used = total.saturating_sub(disk.available_space());
        Ok(used_percent(used, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_is_a_percentage() {
        let mut source = SysinfoSource::new();
        let memory = source.sample_memory().unwrap();
        assert!((0.0..=100.0).contains(&memory), "memory: {memory}");
    }

    #[test]
    fn cpu_is_a_percentage() {
        let mut source = SysinfoSource::new();
        std::thread::sleep(std::time::Duration::from_millis(250));
        let cpu = source.sample_cpu().unwrap();
        assert!(cpu >= 0.0, "cpu: {cpu}");
    }

    #[test]
    fn unknown_mount_point_fails() {
        let mut source = SysinfoSource::new();
        let path = Path::new("/potato/does/not/exist");
        let error = source.sample_disk(path).unwrap_err();
        assert!(matches!(error, Error::DiskNotFound(_)), "error: {error:?}");
    }

    #[test]
    fn used_percent_of_total() {
        assert_eq!(used_percent(25, 100), 25.0);
        assert_eq!(used_percent(100, 100), 100.0);
    }
}
