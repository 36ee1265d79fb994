#![deny(warnings)]

//! Host-side collaborators around the calculation engine.
//!
//! Everything here belongs to the application shell rather than the engine:
//! persisted settings, the terms-of-service gate, the dashboard tip rotator,
//! input validation and presentation formatting.

pub mod input;
pub mod present;
pub mod settings;
pub mod terms;
pub mod tips;

pub use settings::HostSettings;
pub use terms::{ensure_terms_accepted, TermsOutcome, TERMS_REQUIRED_MESSAGE};
pub use tips::{Tip, TipRotator};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to access settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_yaml::Error),
    /// User input outside the accepted range; the message is user-facing.
    #[error("{0}")]
    InvalidInput(String),
}
