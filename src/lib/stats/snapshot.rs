use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Latest known utilization of the host, in percent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Cpu, Metric::Memory, Metric::Disk];

    /// What failed, as written in the error lines of the metric log.
    pub fn failure_subject(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU percent",
            Self::Memory => "memory info",
            Self::Disk => "disk usage",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Memory => write!(f, "Memory"),
            Self::Disk => write!(f, "Disk"),
        }
    }
}

/// Creates an empty store, returning its only writer and a first reader.
pub fn channel() -> (SnapshotWriter, SnapshotReader) {
    let inner = Arc::new(RwLock::new(Snapshot::default()));

    (
        SnapshotWriter {
            inner: inner.clone(),
        },
        SnapshotReader { inner },
    )
}

/// Exclusive write access to the store. There is exactly one per store.
#[derive(Debug)]
pub struct SnapshotWriter {
    inner: Arc<RwLock<Snapshot>>,
}

impl SnapshotWriter {
    pub fn update(&self, metric: Metric, value: f64) {
        // A Snapshot is plain data, a poisoned lock still holds a valid one
        let mut snapshot = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match metric {
            Metric::Cpu => snapshot.cpu_usage = value,
            Metric::Memory => snapshot.memory_usage = value,
            Metric::Disk => snapshot.disk_usage = value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotReader {
    inner: Arc<RwLock<Snapshot>>,
}

impl SnapshotReader {
    pub fn read(&self) -> Snapshot {
        *self
            .inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let (_writer, reader) = channel();
        assert_eq!(reader.read(), Snapshot::default());
        assert_eq!(
            serde_json::to_value(reader.read()).unwrap(),
            serde_json::json!({"cpu_usage": 0.0, "memory_usage": 0.0, "disk_usage": 0.0})
        );
    }

    #[test]
    fn update_touches_a_single_field() {
        let (writer, reader) = channel();

        writer.update(Metric::Memory, 65.3);
        assert_eq!(
            reader.read(),
            Snapshot {
                cpu_usage: 0.0,
                memory_usage: 65.3,
                disk_usage: 0.0,
            }
        );

        writer.update(Metric::Cpu, 10.5);
        writer.update(Metric::Disk, 75.4);
        writer.update(Metric::Memory, 12.0);
        assert_eq!(
            reader.read(),
            Snapshot {
                cpu_usage: 10.5,
                memory_usage: 12.0,
                disk_usage: 75.4,
            }
        );
    }

    #[test]
    fn readers_share_the_writer_state() {
        let (writer, reader) = channel();
        let cloned_reader = reader.clone();

        writer.update(Metric::Disk, 42.0);

        assert_eq!(reader.read().disk_usage, 42.0);
        assert_eq!(cloned_reader.read().disk_usage, 42.0);
    }

    #[test]
    fn concurrent_readers_see_whole_values() {
        let (writer, reader) = channel();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let reader = reader.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let snapshot = reader.read();
                        assert!(snapshot.cpu_usage == 0.0 || snapshot.cpu_usage == 50.0);
                    }
                })
            })
            .collect();

        for _ in 0..1000 {
            writer.update(Metric::Cpu, 50.0);
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn log_labels() {
        assert_eq!(Metric::Cpu.to_string(), "CPU");
        assert_eq!(Metric::Memory.to_string(), "Memory");
        assert_eq!(Metric::Disk.to_string(), "Disk");
        assert_eq!(Metric::Memory.failure_subject(), "memory info");
    }
}
