//! HTTP retrieval of pinned binaries.

use color_eyre::eyre::Context;
use reqwest::blocking::{Client, Response};
use std::io::Write;
use tracing::debug;

use crate::error::DownloadError;

/// Observability target for download events.
const LOG_TARGET: &str = "precommit_hooks::download";

/// Fetches a URL into a writer.
///
/// [`crate::cache::BinaryCache`] only talks to the network through this trait
/// so the cache can be driven without HTTP.
pub trait Downloader {
    /// Streams the body served at `url` into `sink`, returning the number of
    /// bytes written.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] when the request fails, the server answers
    /// with a non-success status, or the transfer is interrupted.
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64, DownloadError>;
}

/// Blocking `reqwest` downloader with the client's default redirect and
/// timeout behaviour. No retries are attempted.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Builds a downloader with a crate-identifying user agent.
    ///
    /// Must not be called from within an async runtime.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, DownloadError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64, DownloadError> {
        debug!(target: LOG_TARGET, url = %url, "requesting");
        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(Response::error_for_status)
            .with_context(|| format!("failed to download {url}"))?;

        let written = response
            .copy_to(sink)
            .with_context(|| format!("download of {url} was interrupted"))?;
        debug!(target: LOG_TARGET, url = %url, bytes = written, "download complete");
        Ok(written)
    }
}
