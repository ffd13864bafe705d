#![warn(missing_docs)]

//! `hdfs` binary entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use hdfs_cli::cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let status = cli.run().await?;
    Ok(ExitCode::from(status as u8))
}
