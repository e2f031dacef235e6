//! Dotted version strings (`major.minor[.patch][-tag]`).

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use crate::OsError;

/// Version with up to three numeric components and an optional build tag.
///
/// Ordering compares the numeric components only; a missing patch compares as 0.
/// The tag is kept for display and for [`VersionString::fidelity_equal`].
#[derive(Debug, Clone, Eq)]
pub struct VersionString {
    major: u32,
    minor: u32,
    patch: Option<u32>,
    tag: Option<String>,
}

impl VersionString {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
            tag: None,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> Option<u32> {
        self.patch
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Equal in every component that both versions specify, tag included.
    pub fn fidelity_equal(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.tag == other.tag
    }

    /// Next version that only differs in the last specified component.
    pub fn next_patch(&self) -> Self {
        Self::new(self.major, self.minor, self.patch.unwrap_or(0) + 1)
    }

    fn key(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch.unwrap_or(0))
    }
}

impl PartialEq for VersionString {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl core::hash::Hash for VersionString {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for VersionString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl FromStr for VersionString {
    type Err = OsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OsError::InvalidVersion {
            text: s.to_string(),
        };
        let trimmed = s.trim();
        let (numbers, tag) = match trimmed.split_once(['-', '+']) {
            Some((n, t)) if !t.is_empty() => (n, Some(t.to_string())),
            Some(_) => return Err(invalid()),
            None => (trimmed, None),
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid());
        }
        let parse = |p: &str| p.parse::<u32>().map_err(|_| invalid());
        Ok(Self {
            major: parse(parts[0])?,
            minor: parse(parts[1])?,
            patch: match parts.get(2) {
                Some(p) => Some(parse(p)?),
                None => None,
            },
            tag,
        })
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        if let Some(tag) = &self.tag {
            write!(f, "-{}", tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionString {
        s.parse().unwrap()
    }

    #[test]
    fn ordering_ignores_missing_patch_and_tag() {
        assert!(v("0.10.1") > v("0.9.6"));
        assert!(v("1.0") < v("1.0.1"));
        assert_eq!(v("1.2"), v("1.2.0"));
        assert_eq!(v("3.0.0-rc1"), v("3.0.0"));
        assert!(!v("3.0.0-rc1").fidelity_equal(&v("3.0.0")));
    }

    #[test]
    fn rejects_garbage() {
        assert!("1".parse::<VersionString>().is_err());
        assert!("a.b.c".parse::<VersionString>().is_err());
        assert!("1.2.3.4".parse::<VersionString>().is_err());
        assert!("1.2-".parse::<VersionString>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for s in ["1.2", "0.10.4", "22.1.0-beta"] {
            assert_eq!(v(s).to_string(), s);
        }
    }
}
