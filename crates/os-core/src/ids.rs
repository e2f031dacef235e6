use core::fmt;
use core::num::NonZeroU32;
use core::str::FromStr;

use uuid::Uuid;

use crate::OsError;

/// Compact, stable arena index for objects held by a workspace.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        // index+1 must be nonzero
        Self(NonZeroU32::new(index + 1).expect("index+1 is nonzero"))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Slot of an object inside a `Workspace`.
pub type ObjectId = Id;

/// Universally unique identifier of an object.
///
/// Handles survive save/load of OpenStudio files, arena ids do not.
/// Printed in braces, `{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Handle(Uuid);

impl Handle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse text that looks like a handle; `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for Handle {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for Handle {
    type Err = OsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .unwrap_or(trimmed);
        Uuid::parse_str(inner)
            .map(Self)
            .map_err(|_| OsError::InvalidHandle {
                text: s.to_string(),
            })
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn handle_prints_with_braces_and_parses_back() {
        let handle = Handle::new();
        let text = handle.to_string();
        assert!(text.starts_with('{') && text.ends_with('}'));
        assert_eq!(text.parse::<Handle>().unwrap(), handle);
    }

    #[test]
    fn handle_parses_without_braces() {
        let h = Handle::parse("0b9e4ad2-5b1f-4a44-b8ae-0b0c5cfe6b2f").unwrap();
        assert_eq!(h.to_string(), "{0b9e4ad2-5b1f-4a44-b8ae-0b0c5cfe6b2f}");
        assert!(Handle::parse("Space 1").is_none());
    }
}
