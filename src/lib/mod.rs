#[macro_use]
extern crate lazy_static;
extern crate tracing;

pub mod app;
pub mod cli;
pub mod logger;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod stats;
