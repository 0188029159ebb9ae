use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use msdl_core::config::{self, DownloadOptions};
use msdl_core::service::DownloadService;

/// Download accelerator that fetches a file from multiple sources
/// concurrently.
#[derive(Debug, Parser)]
#[command(name = "msdl")]
#[command(about = "Fetch one file from several mirrors concurrently, in chunks", long_about = None)]
pub struct Cli {
    /// Source URLs asserted to serve the same file.
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Max number of concurrent connections (defaults from the config file).
    #[arg(short, long)]
    pub connections: Option<usize>,

    /// Timeout for each request in seconds (defaults from the config file).
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Check that the downloaded file's MD5 matches the sources' ETag, when
    /// one is advertised.
    #[arg(long)]
    pub check_integrity: bool,

    /// Destination file path.
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn run_from_args() -> Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let defaults = config::load_or_init()?;
    tracing::debug!(?defaults, "loaded config defaults");

    let opts = DownloadOptions {
        connections: cli.connections.unwrap_or(defaults.connections).max(1),
        timeout_seconds: cli.timeout.unwrap_or(defaults.timeout_seconds).max(1),
        check_integrity: cli.check_integrity,
        destination_path: cli.file,
        quiet: cli.quiet,
    };

    let service = DownloadService::new(opts);
    service.download(&cli.urls)?;
    Ok(())
}
