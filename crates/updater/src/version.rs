//! Release tag parsing and ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::UpdateError;

/// Strip decorations from a release tag: surrounding whitespace, a leading
/// `v`, then a leading `ReCal-` (both case-insensitive).
pub fn trim_tag_prefix(tag: &str) -> &str {
    let mut s = tag.trim();
    if let Some(rest) = s.strip_prefix(['v', 'V']) {
        s = rest;
    }
    const APP_PREFIX: &str = "recal-";
    if s
        .get(..APP_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(APP_PREFIX))
    {
        s = &s[APP_PREFIX.len()..];
    }
    s
}

/// Dotted release version with two to four numeric components.
///
/// The last component may carry an alphabetic suffix (`1.4.1b`). Missing
/// components compare as zero; a suffixed version sorts after the same
/// version without suffix.
#[derive(Clone, Debug)]
pub struct ReleaseVersion {
    components: [u64; 4],
    len: usize,
    suffix: String,
}

impl ReleaseVersion {
    pub fn parse(tag: &str) -> Result<Self, UpdateError> {
        let invalid = || UpdateError::InvalidVersion(tag.to_string());
        let text = trim_tag_prefix(tag);
        let parts: Vec<&str> = text.split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(invalid());
        }
        let mut components = [0u64; 4];
        let mut suffix = String::new();
        for (i, part) in parts.iter().enumerate() {
            let digits_end = part
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(part.len());
            let (digits, rest) = part.split_at(digits_end);
            if digits.is_empty() {
                return Err(invalid());
            }
            if !rest.is_empty() {
                let is_last = i + 1 == parts.len();
                if !is_last || !rest.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid());
                }
                suffix = rest.to_ascii_lowercase();
            }
            components[i] = digits.parse().map_err(|_| invalid())?;
        }
        Ok(Self {
            components,
            len: parts.len(),
            suffix,
        })
    }
}

impl FromStr for ReleaseVersion {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for ReleaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReleaseVersion {}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components
            .cmp(&other.components)
            .then_with(|| self.suffix.cmp(&other.suffix))
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components[..self.len]
            .iter()
            .map(u64::to_string)
            .collect();
        write!(f, "{}{}", parts.join("."), self.suffix)
    }
}

/// Whether `latest_tag` is strictly newer than `current`.
///
/// A tag that does not parse is never newer.
pub fn is_newer(latest_tag: &str, current: &ReleaseVersion) -> bool {
    ReleaseVersion::parse(latest_tag)
        .map(|latest| latest > *current)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(s: &str) -> ReleaseVersion {
        ReleaseVersion::parse(s).unwrap()
    }

    #[test]
    fn strips_tag_decorations() {
        assert_eq!(trim_tag_prefix(" v1.2.3 "), "1.2.3");
        assert_eq!(trim_tag_prefix("V1.2"), "1.2");
        assert_eq!(trim_tag_prefix("ReCal-1.4.2"), "1.4.2");
        assert_eq!(trim_tag_prefix("vRecal-1.4.2"), "1.4.2");
        assert_eq!(trim_tag_prefix("1.0"), "1.0");
        assert_eq!(trim_tag_prefix(""), "");
    }

    #[test]
    fn parses_suffix_on_last_component() {
        let cur = v("1.4.1b");
        assert_eq!(cur.to_string(), "1.4.1b");
        assert!(ReleaseVersion::parse("1.4b.1").is_err());
        assert!(ReleaseVersion::parse("1.4.1-beta").is_err());
        assert!(ReleaseVersion::parse("1").is_err());
        assert!(ReleaseVersion::parse("1.2.3.4.5").is_err());
        assert!(ReleaseVersion::parse("").is_err());
        assert!(ReleaseVersion::parse("latest").is_err());
    }

    #[test]
    fn ordering() {
        assert!(v("1.4.2") > v("1.4.1b"));
        assert!(v("1.4.1c") > v("1.4.1b"));
        assert!(v("1.4.1b") > v("1.4.1"));
        assert!(v("2.0") > v("1.99.99.99"));
        assert_eq!(v("1.4"), v("1.4.0"));
    }

    #[test]
    fn newer_check() {
        let cur = v("1.4.1b");
        assert!(is_newer("v1.5.0", &cur));
        assert!(is_newer("ReCal-1.4.1c", &cur));
        assert!(!is_newer("v1.4.1b", &cur));
        assert!(!is_newer("v1.4.0", &cur));
        assert!(!is_newer("nightly", &cur));
    }

    proptest! {
        #[test]
        fn bump_is_newer(a in 0u64..1000, b in 0u64..1000, c in 0u64..1000) {
            let same = format!("{a}.{b}.{c}");
            let patch_bump = format!("v{a}.{b}.{}", c + 1);
            let minor_bump = format!("{a}.{}.0", b + 1);
            let cur = v(&same);
            prop_assert!(is_newer(&patch_bump, &cur));
            prop_assert!(is_newer(&minor_bump, &cur));
            prop_assert!(!is_newer(&same, &cur));
        }
    }
}
