//! Terms-of-service gate.

use std::path::Path;
use tracing::{info, warn};

use crate::HostSettings;

/// Shown when the user declines; the application exits afterwards.
pub const TERMS_REQUIRED_MESSAGE: &str =
    "You must accept the Terms of Service to use this application.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermsOutcome {
    /// Accepted in an earlier session; no prompt shown.
    AlreadyAccepted,
    Accepted,
    Declined,
}

impl TermsOutcome {
    pub fn may_continue(self) -> bool {
        !matches!(self, TermsOutcome::Declined)
    }
}

/// Ask for acceptance unless `settings` already record it.
///
/// On acceptance the flag is set and, when `save_to` is given, persisted.
/// A failed save is logged and ignored since the user has agreed.
pub fn ensure_terms_accepted(
    settings: &mut HostSettings,
    save_to: Option<&Path>,
    prompt: impl FnOnce() -> bool,
) -> TermsOutcome {
    if settings.terms_accepted {
        return TermsOutcome::AlreadyAccepted;
    }
    if !prompt() {
        info!("terms of service declined");
        return TermsOutcome::Declined;
    }
    settings.terms_accepted = true;
    if let Some(path) = save_to {
        if let Err(e) = settings.save(path) {
            warn!(error = %e, "could not persist terms acceptance");
        }
    }
    info!("terms of service accepted");
    TermsOutcome::Accepted
}
