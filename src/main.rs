mod cli;
mod config;
mod download;
mod error;
mod metadata;
mod parquet;
mod pipeline;
mod reading;
mod series;
mod summary;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};
use config::ConvertConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Convert(args) => {
            let config = ConvertConfig::from_args(args)?;
            let summary = command::convert(config).await?;
            summary.print();
        }
        Commands::Download(args) => {
            let summary = command::download(args).await?;
            summary.print();
        }
        Commands::Export(args) => {
            let summary = command::export(args).await?;
            summary.print(&args.output);
        }
        Commands::Summary(args) => {
            let report = command::summary(args).await?;
            report.print();
        }
    }

    Ok(())
}
