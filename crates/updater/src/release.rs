//! GitHub release metadata and the HTTP source that fetches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use std::time::Duration;
use tracing::debug;

use crate::{UpdateConfig, UpdateError};

/// Subset of the GitHub "latest release" payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes (markdown).
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// Where release metadata and assets come from.
pub trait ReleaseSource {
    /// Metadata of the most recent published release.
    fn fetch_latest(&self) -> Result<GitHubRelease, UpdateError>;

    /// Stream `asset` into `out`, reporting whole-percent progress.
    /// Returns the number of bytes written.
    fn download_asset(
        &self,
        asset: &GitHubAsset,
        out: &mut dyn Write,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<u64, UpdateError>;
}

/// One-shot blocking client for the GitHub REST API.
pub struct GitHubReleaseSource {
    client: reqwest::blocking::Client,
    latest_url: String,
}

impl GitHubReleaseSource {
    pub fn new(config: &UpdateConfig) -> Result<Self, UpdateError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            latest_url: config.latest_release_url(),
        })
    }
}

impl ReleaseSource for GitHubReleaseSource {
    fn fetch_latest(&self) -> Result<GitHubRelease, UpdateError> {
        debug!(url = %self.latest_url, "fetching latest release");
        let release = self
            .client
            .get(&self.latest_url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()?
            .error_for_status()?
            .json::<GitHubRelease>()?;
        Ok(release)
    }

    fn download_asset(
        &self,
        asset: &GitHubAsset,
        out: &mut dyn Write,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<u64, UpdateError> {
        debug!(url = %asset.browser_download_url, "downloading asset");
        let mut resp = self
            .client
            .get(&asset.browser_download_url)
            .send()?
            .error_for_status()?;
        let total = resp.content_length().or(Some(asset.size).filter(|s| *s > 0));
        Ok(copy_with_progress(&mut resp, out, total, on_progress)?)
    }
}

/// Copy `reader` into `writer`, calling `on_progress` whenever the completed
/// percentage changes. Always finishes with 100 on success.
pub fn copy_with_progress(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    total: Option<u64>,
    on_progress: &mut dyn FnMut(u8),
) -> io::Result<u64> {
    let mut buf = [0u8; 16 * 1024];
    let mut done: u64 = 0;
    let mut last: Option<u8> = None;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        done += n as u64;
        if let Some(total) = total.filter(|t| *t > 0) {
            let pct = (done.saturating_mul(100) / total).min(100) as u8;
            if last != Some(pct) {
                on_progress(pct);
                last = Some(pct);
            }
        }
    }
    writer.flush()?;
    if last != Some(100) {
        on_progress(100);
    }
    Ok(done)
}
