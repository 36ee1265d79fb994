//! Dashboard tip rotation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::RangeInclusive;
use std::time::Duration;

pub const DEFAULT_TIPS: [&str; 9] = [
    "Join the Discord: https://discord.gg/2CXVDasA6Z",
    "Developer: Asuneteric",
    "Be sure to give me your opinions in my Discord server.",
    "Try different locker counts to compare costs quickly.",
    "Tip: Smaller batches help you plan material runs.",
    "Want updates? Check the Discord announcements.",
    "If the UI feels cramped, widen the window for a clearer layout.",
    "Found a bug? Let me know on Discord.",
    "Suggestions and feedback are always welcome.",
];

/// Seconds until the next rotation, drawn uniformly.
pub const INTERVAL_SECS: RangeInclusive<u64> = 7..=90;

const DEFAULT_SEED: u64 = 0x5EC_A1;

/// A tip to display and how long to display it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tip<'a> {
    pub text: &'a str,
    pub next_in: Duration,
}

/// Picks random tips with random display intervals from a seeded RNG.
pub struct TipRotator {
    tips: Vec<String>,
    rng: ChaCha8Rng,
}

impl TipRotator {
    /// Rotator over [`DEFAULT_TIPS`].
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_tips(DEFAULT_TIPS.iter().map(|t| t.to_string()), seed)
    }

    pub fn with_tips(tips: impl IntoIterator<Item = String>, seed: Option<u64>) -> Self {
        Self {
            tips: tips.into_iter().collect(),
            rng: ChaCha8Rng::seed_from_u64(seed.unwrap_or(DEFAULT_SEED)),
        }
    }

    /// Next tip, or `None` when there are no tips to show.
    pub fn next_tip(&mut self) -> Option<Tip<'_>> {
        if self.tips.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..self.tips.len());
        let secs = self.rng.gen_range(INTERVAL_SECS);
        Some(Tip {
            text: &self.tips[idx],
            next_in: Duration::from_secs(secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_rotator_shows_nothing() {
        let mut r = TipRotator::with_tips(Vec::new(), None);
        assert!(r.next_tip().is_none());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = TipRotator::new(Some(42));
        let mut b = TipRotator::new(Some(42));
        for _ in 0..20 {
            let ta = a.next_tip().map(|t| (t.text.to_string(), t.next_in));
            let tb = b.next_tip().map(|t| (t.text.to_string(), t.next_in));
            assert_eq!(ta, tb);
        }
    }

    proptest! {
        #[test]
        fn tips_and_intervals_stay_in_range(seed in any::<u64>()) {
            let mut r = TipRotator::new(Some(seed));
            for _ in 0..10 {
                let tip = r.next_tip().unwrap();
                prop_assert!(DEFAULT_TIPS.contains(&tip.text));
                prop_assert!(INTERVAL_SECS.contains(&tip.next_in.as_secs()));
            }
        }
    }
}
