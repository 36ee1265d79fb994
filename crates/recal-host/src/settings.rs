//! Persisted host settings (YAML).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use updater::UpdateConfig;

use crate::HostError;

/// Default settings file name in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "recal.yaml";

/// Settings passed explicitly to every collaborator that needs them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Set once the user agrees to the terms of service.
    pub terms_accepted: bool,
    pub check_for_updates: bool,
    pub update: UpdateConfig,
    /// Manifest file name used by the integrity check.
    pub integrity_manifest: String,
    /// Seed for tip rotation; a fixed default keeps runs reproducible.
    pub tip_seed: Option<u64>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            terms_accepted: false,
            check_for_updates: true,
            update: UpdateConfig::default(),
            integrity_manifest: "Integrity.manifest.json".to_string(),
            tip_seed: None,
        }
    }
}

impl HostSettings {
    /// Load settings from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|source| HostError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the whole document to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), HostError> {
        let io_err = |source| HostError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_yaml::to_string(self).map_err(HostError::Encode)?;
        fs::write(path, text).map_err(io_err)?;
        info!(path = %path.display(), "settings saved");
        Ok(())
    }
}
