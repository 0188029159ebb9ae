//! Download service facade.
//!
//! Composes the pipeline: probe → reconcile → prioritize → create staging →
//! plan → fetch → seal → verify → publish, short-circuiting on the first
//! error. On failure the staging file is left behind.

use std::time::Duration;

use crate::checksum;
use crate::client::HttpClient;
use crate::config::DownloadOptions;
use crate::downloader;
use crate::error::DownloadError;
use crate::planner;
use crate::probe;
use crate::source;
use crate::storage::{self, StagingFileBuilder};

/// The download service. Construct once with options, then download.
pub struct DownloadService {
    opts: DownloadOptions,
    client: HttpClient,
}

impl DownloadService {
    pub fn new(opts: DownloadOptions) -> Self {
        let client = HttpClient::new(Duration::from_secs(opts.timeout_seconds));
        Self { opts, client }
    }

    /// Downloads the file served by `source_urls` to the configured
    /// destination. The URLs are asserted to serve the same file; the probe
    /// and reconcile steps verify as much of that as HEAD metadata allows.
    pub fn download(&self, source_urls: &[String]) -> Result<(), DownloadError> {
        if source_urls.is_empty() {
            return Err(DownloadError::NoSources);
        }

        let sources = probe::probe_sources(&self.client, source_urls)?;
        let metadata = source::reconcile(&sources, self.opts.check_integrity)?;
        let urls = source::prioritized_urls(&sources);

        tracing::info!(
            size = metadata.size,
            sources = urls.len(),
            connections = self.opts.connections,
            "starting chunked download"
        );

        let staging_path = storage::staging_path(&self.opts.destination_path);
        let mut builder = StagingFileBuilder::create(&staging_path)?;
        builder.preallocate(metadata.size)?;
        let staging = builder.build();

        let chunks = planner::plan_chunks(metadata.size, self.opts.connections);
        downloader::download_chunks(
            &self.client,
            &urls,
            &chunks,
            &staging,
            self.opts.connections,
            self.opts.quiet,
        )?;

        let sealed = staging.seal()?;

        if self.opts.check_integrity && !metadata.integrity_tag.is_empty() {
            let actual = checksum::md5_path(sealed.path())?;
            if actual != metadata.integrity_tag {
                return Err(DownloadError::IntegrityMismatch {
                    expected: metadata.integrity_tag,
                    actual,
                });
            }
        }

        sealed.publish(&self.opts.destination_path)?;

        if !self.opts.quiet {
            println!("Download complete: {}", self.opts.destination_path.display());
        }

        Ok(())
    }
}
