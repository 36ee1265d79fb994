//! Validation of user-entered counts before they reach the engine.

use recal_core::{CIGAR_COUNT_MAX, COUNT_MIN, LOCKER_COUNT_MAX};

use crate::HostError;

fn parse_bounded(text: &str, max: u32) -> Result<u32, HostError> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (COUNT_MIN..=max).contains(n))
        .ok_or_else(|| {
            HostError::InvalidInput(format!(
                "Please enter a valid number between {COUNT_MIN} and {max}."
            ))
        })
}

/// Locker count in 1..=1000. The locker calculator relies on this check.
pub fn parse_locker_count(text: &str) -> Result<u32, HostError> {
    parse_bounded(text, LOCKER_COUNT_MAX)
}

/// Cigar count in 1..=10000; the cigar calculator checks the same bound again.
pub fn parse_cigar_count(text: &str) -> Result<u32, HostError> {
    parse_bounded(text, CIGAR_COUNT_MAX)
}
