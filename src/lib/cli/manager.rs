use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tracing::*;

use crate::stats::sampler::{DEFAULT_INTERVAL, MAX_INTERVAL};

pub const DEFAULT_LOG_FILE_NAME: &str = "hardware_log.txt";
pub const DEFAULT_LOG_INTERVAL: Duration = DEFAULT_INTERVAL;

#[derive(Parser, Debug)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
struct Args {
    /// File where the sampled metrics are written, one line per metric per tick.
    #[arg(long, value_name = "FILE", env = "LOG_FILE_NAME", default_value = DEFAULT_LOG_FILE_NAME)]
    log_file: String,

    /// Sampling period in seconds. Invalid values fall back to the default.
    #[arg(long, value_name = "SECONDS", env = "LOG_INTERVAL")]
    log_interval: Option<String>,

    /// Mount point used to compute the disk usage.
    #[arg(long, value_name = "PATH", env = "DISK_PATH", default_value = "/")]
    disk_path: PathBuf,

    /// Sets the address for the REST API server.
    #[arg(long, value_name = "IP:PORT", env = "REST_SERVER", default_value = "0.0.0.0:8080")]
    rest_server: String,

    /// Do not start the REST API server.
    #[arg(long)]
    no_server: bool,

    /// Directory used to store the diagnostic log files.
    #[arg(long, value_name = "PATH", env = "LOG_PATH")]
    log_path: Option<PathBuf>,

    /// Turns all console log levels to debug.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct Manager {
    clap_matches: Args,
}

lazy_static! {
    static ref MANAGER: Arc<Manager> = Arc::new(Manager::new());
}

impl Manager {
    fn new() -> Self {
        Self {
            clap_matches: Args::parse(),
        }
    }
}

// Construct our manager, should be done inside main
pub fn init() {
    MANAGER.as_ref();
}

// Check if the verbosity parameter was used
pub fn is_verbose() -> bool {
    MANAGER.clap_matches.verbose
}

pub fn log_file() -> PathBuf {
    log_file_or_default(&MANAGER.clap_matches.log_file)
}

pub fn log_interval() -> Duration {
    parse_log_interval(MANAGER.clap_matches.log_interval.as_deref())
}

pub fn disk_path() -> PathBuf {
    MANAGER.clap_matches.disk_path.clone()
}

// Return the desired address for the REST API, if it is enabled
pub fn server_address() -> Option<String> {
    if MANAGER.clap_matches.no_server {
        return None;
    }

    Some(MANAGER.clap_matches.rest_server.clone())
}

pub fn log_path() -> Option<PathBuf> {
    MANAGER.clap_matches.log_path.clone()
}

// Return the command line used to start this application
pub fn command_line_string() -> String {
    std::env::args().collect::<Vec<String>>().join(" ")
}

// Return a clone of current Args struct
pub fn command_line() -> String {
    format!("{:#?}", MANAGER.clap_matches)
}

/// An exported-but-empty `LOG_FILE_NAME` means "use the default".
fn log_file_or_default(log_file: &str) -> PathBuf {
    if log_file.trim().is_empty() {
        return PathBuf::from(DEFAULT_LOG_FILE_NAME);
    }

    PathBuf::from(log_file)
}

/// Interval in whole seconds; anything unparsable, not positive or above
/// [`MAX_INTERVAL`] falls back to [`DEFAULT_LOG_INTERVAL`].
pub fn parse_log_interval(value: Option<&str>) -> Duration {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return DEFAULT_LOG_INTERVAL;
    };

    match value.parse::<i64>() {
        Ok(seconds) if seconds > MAX_INTERVAL.as_secs() as i64 => {
            warn!(
                "Invalid LOG_INTERVAL {seconds:?}, it must be at most {}. Using default: {:?}",
                MAX_INTERVAL.as_secs(),
                DEFAULT_LOG_INTERVAL
            );
            DEFAULT_LOG_INTERVAL
        }
        Ok(seconds) if seconds > 0 => Duration::from_secs(seconds as u64),
        Ok(seconds) => {
            warn!(
                "Invalid LOG_INTERVAL {seconds:?}, it must be positive. Using default: {:?}",
                DEFAULT_LOG_INTERVAL
            );
            DEFAULT_LOG_INTERVAL
        }
        Err(error) => {
            warn!(
                "Invalid LOG_INTERVAL {value:?} ({error}), using default: {:?}",
                DEFAULT_LOG_INTERVAL
            );
            DEFAULT_LOG_INTERVAL
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn interval_defaults_when_unset() {
        assert_eq!(parse_log_interval(None), DEFAULT_LOG_INTERVAL);
        assert_eq!(parse_log_interval(Some("")), DEFAULT_LOG_INTERVAL);
        assert_eq!(parse_log_interval(Some("   ")), DEFAULT_LOG_INTERVAL);
    }

    #[test]
    fn interval_in_seconds() {
        assert_eq!(parse_log_interval(Some("1")), Duration::from_secs(1));
        assert_eq!(parse_log_interval(Some(" 42 ")), Duration::from_secs(42));
    }

    #[traced_test]
    #[test]
    fn interval_not_a_number_falls_back() {
        assert_eq!(
            parse_log_interval(Some("not-a-number")),
            DEFAULT_LOG_INTERVAL
        );
        assert!(logs_contain("Invalid LOG_INTERVAL"));
    }

    #[traced_test]
    #[test]
    fn interval_not_positive_falls_back() {
        assert_eq!(parse_log_interval(Some("0")), DEFAULT_LOG_INTERVAL);
        assert_eq!(parse_log_interval(Some("-3")), DEFAULT_LOG_INTERVAL);
        assert!(logs_contain("it must be positive"));
    }

    #[traced_test]
    #[test]
    fn interval_too_large_falls_back() {
        assert_eq!(
            parse_log_interval(Some("9223372036854775807")),
            DEFAULT_LOG_INTERVAL
        );
        assert_eq!(
            parse_log_interval(Some(&(MAX_INTERVAL.as_secs() + 1).to_string())),
            DEFAULT_LOG_INTERVAL
        );
        assert_eq!(
            parse_log_interval(Some(&MAX_INTERVAL.as_secs().to_string())),
            MAX_INTERVAL
        );
        assert!(logs_contain("it must be at most"));
    }

    #[test]
    fn empty_log_file_uses_default() {
        assert_eq!(
            log_file_or_default(""),
            PathBuf::from(DEFAULT_LOG_FILE_NAME)
        );
        assert_eq!(
            log_file_or_default("/tmp/potato.txt"),
            PathBuf::from("/tmp/potato.txt")
        );
    }

    #[test]
    fn arguments_from_command_line() {
        let args = Args::try_parse_from([
            "hardware-monitor",
            "--log-file",
            "/tmp/potato.txt",
            "--log-interval",
            "2",
            "--no-server",
        ])
        .unwrap();

        assert_eq!(args.log_file, "/tmp/potato.txt");
        assert_eq!(args.log_interval.as_deref(), Some("2"));
        assert!(args.no_server);
        assert!(!args.verbose);
    }
}
