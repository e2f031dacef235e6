//! Field definitions.

use core::fmt;
use core::str::FromStr;

/// Alpha (`A1`) or numeric (`N1`) slot as declared in the IDD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Alpha,
    Numeric,
}

/// Value type declared through `\type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Alpha,
    Real,
    Integer,
    Choice,
    ObjectList,
    Handle,
    Node,
    Url,
    ExternalList,
}

impl FieldType {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Real | FieldType::Integer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Alpha => "alpha",
            FieldType::Real => "real",
            FieldType::Integer => "integer",
            FieldType::Choice => "choice",
            FieldType::ObjectList => "object-list",
            FieldType::Handle => "handle",
            FieldType::Node => "node",
            FieldType::Url => "url",
            FieldType::ExternalList => "external-list",
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "alpha" => FieldType::Alpha,
            "real" => FieldType::Real,
            "integer" => FieldType::Integer,
            "choice" => FieldType::Choice,
            "object-list" => FieldType::ObjectList,
            "handle" => FieldType::Handle,
            "node" => FieldType::Node,
            "url" => FieldType::Url,
            "external-list" => FieldType::ExternalList,
            other => return Err(format!("unknown field type '{other}'")),
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric limit; `exclusive` for `\minimum>` / `\maximum<`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBound {
    pub value: f64,
    pub exclusive: bool,
}

impl NumericBound {
    pub fn allows_above(&self, v: f64) -> bool {
        if self.exclusive {
            v > self.value
        } else {
            v >= self.value
        }
    }

    pub fn allows_below(&self, v: f64) -> bool {
        if self.exclusive {
            v < self.value
        } else {
            v <= self.value
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IddField {
    pub name: String,
    pub kind: FieldKind,
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<String>,
    pub units: Option<String>,
    pub minimum: Option<NumericBound>,
    pub maximum: Option<NumericBound>,
    pub keys: Vec<String>,
    pub references: Vec<String>,
    pub object_lists: Vec<String>,
    pub autosizable: bool,
    pub autocalculatable: bool,
    pub begin_extensible: bool,
    pub note: Option<String>,
    /// True once `\type` was given explicitly.
    pub(crate) typed: bool,
}

impl IddField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            field_type: match kind {
                FieldKind::Alpha => FieldType::Alpha,
                FieldKind::Numeric => FieldType::Real,
            },
            required: false,
            default: None,
            units: None,
            minimum: None,
            maximum: None,
            keys: Vec::new(),
            references: Vec::new(),
            object_lists: Vec::new(),
            autosizable: false,
            autocalculatable: false,
            begin_extensible: false,
            note: None,
            typed: false,
        }
    }

    pub fn is_name_field(&self) -> bool {
        self.name.eq_ignore_ascii_case("name")
    }

    pub fn is_pointer(&self) -> bool {
        self.field_type == FieldType::ObjectList
    }

    /// Choice keys match case-insensitively.
    pub fn key(&self, value: &str) -> Option<&str> {
        self.keys
            .iter()
            .find(|k| k.eq_ignore_ascii_case(value))
            .map(String::as_str)
    }

    /// `autosize` / `autocalculate` accepted in place of a number.
    pub fn accepts_auto(&self, value: &str) -> bool {
        (self.autosizable && value.eq_ignore_ascii_case("autosize"))
            || (self.autocalculatable && value.eq_ignore_ascii_case("autocalculate"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_respect_exclusivity() {
        let inclusive = NumericBound {
            value: 0.0,
            exclusive: false,
        };
        let exclusive = NumericBound {
            value: 0.0,
            exclusive: true,
        };
        assert!(inclusive.allows_above(0.0));
        assert!(!exclusive.allows_above(0.0));
        assert!(exclusive.allows_above(1e-9));
        assert!(inclusive.allows_below(0.0));
        assert!(!exclusive.allows_below(0.0));
    }

    #[test]
    fn numeric_fields_default_to_real() {
        let f = IddField::new("Thickness", FieldKind::Numeric);
        assert_eq!(f.field_type, FieldType::Real);
        assert!("object-list".parse::<FieldType>().unwrap() == FieldType::ObjectList);
        assert!("bogus".parse::<FieldType>().is_err());
    }
}
