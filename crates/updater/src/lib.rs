#![deny(warnings)]

//! Release-based self updater.
//!
//! Checks the latest GitHub release once per launch, compares its tag with
//! the running version, and on request downloads the installer asset and
//! launches it. There is no retry policy, patching or signature check; every
//! failure is reported to the caller or, via [`Updater::check_or_skip`],
//! logged and ignored.

mod release;
mod version;

pub use release::{
    copy_with_progress, GitHubAsset, GitHubRelease, GitHubReleaseSource, ReleaseSource,
};
pub use version::{is_newer, trim_tag_prefix, ReleaseVersion};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

/// Update check settings, normally embedded in the host settings file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// `owner/name` of the GitHub repository publishing releases.
    pub repository: String,
    pub api_base: String,
    /// Version of the running build.
    pub current_version: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            repository: "ScriptB/ReCal".to_string(),
            api_base: "https://api.github.com".to_string(),
            current_version: "1.4.1b".to_string(),
            user_agent: "ReCal".to_string(),
            timeout_secs: 10,
        }
    }
}

impl UpdateConfig {
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/releases/latest",
            self.api_base.trim_end_matches('/'),
            self.repository
        )
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid version: {0}")]
    InvalidVersion(String),
    #[error("release {0} has no installer asset")]
    NoInstallerAsset(String),
    #[error("asset name {0:?} is not a plain file name")]
    InvalidAssetName(String),
    #[error("failed to launch {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// First asset that looks like an installer (`.exe` or `.zip`).
pub fn select_installer_asset(release: &GitHubRelease) -> Result<&GitHubAsset, UpdateError> {
    release
        .assets
        .iter()
        .find(|a| {
            let name = a.name.to_ascii_lowercase();
            name.ends_with(".exe") || name.ends_with(".zip")
        })
        .ok_or_else(|| UpdateError::NoInstallerAsset(release.tag_name.clone()))
}

/// Start the downloaded installer without waiting for it.
pub fn launch_installer(path: &Path) -> Result<(), UpdateError> {
    info!(path = %path.display(), "launching installer");
    Command::new(path)
        .spawn()
        .map(|_| ())
        .map_err(|source| UpdateError::Launch {
            path: path.to_path_buf(),
            source,
        })
}

/// Update checker bound to one release source.
pub struct Updater<S: ReleaseSource> {
    config: UpdateConfig,
    source: S,
    checked: AtomicBool,
}

impl Updater<GitHubReleaseSource> {
    /// Updater talking to the GitHub REST API.
    pub fn github(config: UpdateConfig) -> Result<Self, UpdateError> {
        let source = GitHubReleaseSource::new(&config)?;
        Ok(Self::new(config, source))
    }
}

impl<S: ReleaseSource> Updater<S> {
    pub fn new(config: UpdateConfig, source: S) -> Self {
        Self {
            config,
            source,
            checked: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Fetch the latest release and return it when it is newer than the
    /// running version.
    pub fn check(&self) -> Result<Option<GitHubRelease>, UpdateError> {
        let current = ReleaseVersion::parse(&self.config.current_version)?;
        let release = self.source.fetch_latest()?;
        if is_newer(&release.tag_name, &current) {
            info!(current = %current, latest = %release.tag_name, "update available");
            Ok(Some(release))
        } else {
            info!(current = %current, latest = %release.tag_name, "up to date");
            Ok(None)
        }
    }

    /// Like [`Updater::check`] but runs at most once per updater and never
    /// fails; errors are logged.
    pub fn check_or_skip(&self) -> Option<GitHubRelease> {
        if self.checked.swap(true, Ordering::SeqCst) {
            return None;
        }
        match self.check() {
            Ok(release) => release,
            Err(e) => {
                warn!(error = %e, "update check failed");
                None
            }
        }
    }

    /// Download the installer asset of `release` into `dir`.
    pub fn download_installer(
        &self,
        release: &GitHubRelease,
        dir: &Path,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<PathBuf, UpdateError> {
        let asset = select_installer_asset(release)?;
        let file_name = Path::new(&asset.name)
            .file_name()
            .filter(|n| *n == asset.name.as_str())
            .ok_or_else(|| UpdateError::InvalidAssetName(asset.name.clone()))?;
        let target = dir.join(file_name);
        let mut out = BufWriter::new(File::create(&target)?);
        let bytes = self.source.download_asset(asset, &mut out, on_progress)?;
        info!(path = %target.display(), bytes, "installer downloaded");
        Ok(target)
    }
}
