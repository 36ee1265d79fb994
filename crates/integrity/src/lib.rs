#![deny(warnings)]

//! Advisory file-integrity check.
//!
//! A manifest next to the application lists relative paths and their expected
//! SHA-256 digests. The check recomputes every digest and reports missing or
//! altered files. It is a tamper hint for the user, not a security boundary,
//! and it never blocks startup.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default manifest file name, looked up in the application directory.
pub const MANIFEST_FILE_NAME: &str = "Integrity.manifest.json";

/// Errors produced while loading a manifest.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One expected file. Null or blank fields make the entry inert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub path: Option<String>,
    /// Lowercase or uppercase hex digest.
    #[serde(default)]
    pub sha256: Option<String>,
}

impl ManifestEntry {
    /// Path and digest, or `None` when either is missing or blank.
    fn checkable(&self) -> Option<(&str, &str)> {
        let path = self.path.as_deref().filter(|p| !p.trim().is_empty())?;
        let sha = self.sha256.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
        Some((path, sha))
    }
}

/// List of expected files and digests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub files: Vec<ManifestEntry>,
}

/// Why a manifest entry failed verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Missing,
    Modified,
    /// The file exists but could not be read.
    Unreadable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Missing => "missing",
            FailureKind::Modified => "modified",
            FailureKind::Unreadable => "unreadable",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrityFailure {
    pub path: String,
    pub kind: FailureKind,
}

/// Outcome of verifying a manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Entries actually checked (blank entries are skipped).
    pub checked: usize,
    pub failures: Vec<IntegrityFailure>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// User-facing advisory text, or `None` when every file matched.
    pub fn warning_text(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }
        let lines: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("{} ({})", f.path, f.kind))
            .collect();
        Some(format!(
            "Integrity check warning:\n\n{}\n\nThis does not always indicate malware, but the app \
             files appear altered. If you did not modify the app, re-download from the official \
             source.",
            lines.join("\n")
        ))
    }
}

/// Load `name` from `base_dir`. Returns `Ok(None)` when there is no manifest.
pub fn load_manifest(base_dir: &Path, name: &str) -> Result<Option<Manifest>, IntegrityError> {
    let path = base_dir.join(name);
    if !path.exists() {
        debug!(path = %path.display(), "no integrity manifest");
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|source| IntegrityError::Read {
        path: path.clone(),
        source,
    })?;
    let manifest = serde_json::from_str(&text).map_err(|source| IntegrityError::Parse {
        path: path.clone(),
        source,
    })?;
    Ok(Some(manifest))
}

/// Compute the SHA-256 of a file and return it as lowercase hex.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Recompute every digest in `manifest` relative to `base_dir`.
pub fn verify(base_dir: &Path, manifest: &Manifest) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    for (path, expected) in manifest.files.iter().filter_map(ManifestEntry::checkable) {
        report.checked += 1;
        let file_path = base_dir.join(path);
        let kind = if !file_path.exists() {
            Some(FailureKind::Missing)
        } else {
            match sha256_file(&file_path) {
                Ok(hash) if hash.eq_ignore_ascii_case(expected) => None,
                Ok(_) => Some(FailureKind::Modified),
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "could not hash file");
                    Some(FailureKind::Unreadable)
                }
            }
        };
        if let Some(kind) = kind {
            report.failures.push(IntegrityFailure {
                path: path.to_string(),
                kind,
            });
        }
    }
    info!(
        checked = report.checked,
        failures = report.failures.len(),
        "integrity check finished"
    );
    report
}

/// Run the whole check and return the advisory text, if any.
///
/// Never fails: a missing manifest is silent and a broken one is logged.
pub fn verify_or_warn(base_dir: &Path, manifest_name: &str) -> Option<String> {
    match load_manifest(base_dir, manifest_name) {
        Ok(Some(manifest)) => verify(base_dir, &manifest).warning_text(),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "integrity check skipped");
            None
        }
    }
}
