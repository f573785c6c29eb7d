use tracing::*;

use hardware_monitor::{app, cli, logger, metrics::SysinfoSource};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // CLI should be started before logger to allow control over verbosity
    cli::manager::init();
    // Logger should start before everybody else to catch any startup event
    logger::manager::init();

    let settings = app::Settings::from_command_line();
    debug!("Settings: {settings:#?}");

    let log_file = match app::create_log_file(&settings) {
        Ok(log_file) => log_file,
        Err(error) => {
            error!("{error:#}");
            logger::manager::finish();
            return Err(error);
        }
    };

    app::run(settings, SysinfoSource::new(), log_file, std::io::stdin()).await?;

    info!("Program terminated");
    logger::manager::finish();

    Ok(())
}
