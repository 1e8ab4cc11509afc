mod browser;
mod catalog;
mod config;
mod models;
mod pipeline;
mod report;
mod scraper;
mod utils;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(
    name = "yield-watch",
    about = "Point-in-time snapshot of bond yields and debt clock figures",
    version
)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip the headless-browser debt clock pass
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "yield_watch=info,warn",
        1 => "yield_watch=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    let mut pipeline = Pipeline::new(config);
    if cli.no_browser {
        pipeline = pipeline.without_browser();
    }
    pipeline.run().await?;

    Ok(())
}
