use std::sync::{Arc, Mutex};

use tracing::{metadata::LevelFilter, *};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

use crate::cli;

#[derive(Default)]
struct Manager {
    // Keeps the file writer alive, dropping it stops the log file writes
    file_guard: Option<WorkerGuard>,
}

lazy_static! {
    static ref MANAGER: Arc<Mutex<Manager>> = Default::default();
}

// Start logger, should be done inside main
pub fn init() {
    // Redirect all logs from libs using "Log"
    LogTracer::init_with_filter(tracing::log::LevelFilter::Trace).expect("Failed to set logger");

    // Configure the console log
    let console_env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli::manager::is_verbose() {
            EnvFilter::new(LevelFilter::DEBUG.to_string())
        } else {
            EnvFilter::new(LevelFilter::INFO.to_string())
        }
    });

    let console_layer = fmt::Layer::new()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(fmt::format::FmtSpan::NONE)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_filter(filter_unwanted_crates(console_env_filter));

    // Configure the file log, only when a folder was provided
    let file_layer = cli::manager::log_path().map(|dir| {
        let file_appender =
            tracing_appender::rolling::hourly(dir, concat!(env!("CARGO_PKG_NAME"), ".log"));
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        MANAGER.lock().unwrap().file_guard = Some(guard);

        fmt::Layer::new()
            .with_writer(writer)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(fmt::format::FmtSpan::NONE)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_filter(filter_unwanted_crates(EnvFilter::new(
                LevelFilter::DEBUG.to_string(),
            )))
    });

    // Configure the default subscriber
    let subscriber = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .expect("Unable to set a global subscriber");

    info!(
        "{}, version: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );
    info!(
        "Starting at {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
    );
    debug!("Command line call: {}", cli::manager::command_line_string());
    debug!(
        "Command line input struct call: {}",
        cli::manager::command_line()
    );
}

/// Flush and stop the file log writer.
pub fn finish() {
    if let Ok(mut manager) = MANAGER.lock() {
        manager.file_guard.take();
    }
}

fn filter_unwanted_crates(env_filter: EnvFilter) -> EnvFilter {
    env_filter
        // Hyper is used by the web server and it's pretty verbose when it's on
        .add_directive("hyper=off".parse().unwrap())
        .add_directive("h2=off".parse().unwrap())
        .add_directive("mio=off".parse().unwrap())
        .add_directive("actix_server=warn".parse().unwrap())
        .add_directive("actix_http=warn".parse().unwrap())
}
