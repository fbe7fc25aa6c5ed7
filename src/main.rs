mod app;
mod client;
mod clipboard;
mod config;
mod normalize;
mod protocol;
mod server;
mod state;
mod tui;
mod ui;

use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = config::Config::parse();
    init_tracing(config.log_file.as_deref())?;

    let app = app::TedSuiteApp::bootstrap(config).await?;
    app.run().await
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("tedsuite=info"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| eyre!(err))?;
        }
        None => {
            builder
                .with_writer(io::stderr)
                .try_init()
                .map_err(|err| eyre!(err))?;
        }
    }

    Ok(())
}
