use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use sdwan_import::Config;
use std::error::Error;

/// Console-only logging when `log4rs.yml` is not in the working directory.
fn init_console_logging() -> Result<(), Box<dyn Error>> {
    let stdout = ConsoleAppender::builder().build();
    let config = log4rs::config::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(log::LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    if let Err(e) = log4rs::init_file("log4rs.yml", Default::default()) {
        init_console_logging()?;
        log::warn!("log4rs.yml not loaded ({e}), logging to console only");
    }
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let config = Config::from_env()?;
    let summary = sdwan_import::run(&config).await.map_err(|e| {
        log::error!("run aborted: {e}");
        e
    })?;

    log::info!(
        "#End main() accepted={} skipped={} new_routes={}",
        summary.accepted,
        summary.skipped.len(),
        summary.routes.new_routes.len()
    );
    Ok(())
}
