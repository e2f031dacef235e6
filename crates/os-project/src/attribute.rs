//! Named attribute values, possibly nested, attached to analyses and data points.

use serde::Serialize;

use crate::error::{ProjectError, ProjectResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Double(f64),
    String(String),
    Vector(Vec<Attribute>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub display_name: Option<String>,
    pub value: AttributeValue,
    pub units: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            value,
            units: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Child with `name`, for vector attributes.
    pub fn child(&self, name: &str) -> Option<&Attribute> {
        match &self.value {
            AttributeValue::Vector(children) => children.iter().find(|c| c.name == name),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------
// Storage encoding
// ----------------------------------------------------------------------

pub(crate) const TYPE_BOOL: i64 = 0;
pub(crate) const TYPE_INTEGER: i64 = 1;
pub(crate) const TYPE_UNSIGNED: i64 = 2;
pub(crate) const TYPE_DOUBLE: i64 = 3;
pub(crate) const TYPE_STRING: i64 = 4;
pub(crate) const TYPE_VECTOR: i64 = 5;

impl AttributeValue {
    /// Type code and text column value; vectors store their children as rows.
    pub(crate) fn encode(&self) -> (i64, Option<String>) {
        match self {
            AttributeValue::Bool(b) => (TYPE_BOOL, Some(if *b { "1" } else { "0" }.to_string())),
            AttributeValue::Integer(i) => (TYPE_INTEGER, Some(i.to_string())),
            AttributeValue::Unsigned(u) => (TYPE_UNSIGNED, Some(u.to_string())),
            AttributeValue::Double(d) => (TYPE_DOUBLE, Some(format!("{d:?}"))),
            AttributeValue::String(s) => (TYPE_STRING, Some(s.clone())),
            AttributeValue::Vector(_) => (TYPE_VECTOR, None),
        }
    }

    /// Scalar value from its stored form; vectors come back empty.
    pub(crate) fn decode(value_type: i64, text: Option<&str>) -> ProjectResult<Self> {
        let invalid = || ProjectError::InvalidValue {
            what: format!("attribute of type {value_type} stored as {text:?}"),
        };
        let text = text.unwrap_or_default();
        Ok(match value_type {
            TYPE_BOOL => AttributeValue::Bool(text == "1"),
            TYPE_INTEGER => AttributeValue::Integer(text.parse().map_err(|_| invalid())?),
            TYPE_UNSIGNED => AttributeValue::Unsigned(text.parse().map_err(|_| invalid())?),
            TYPE_DOUBLE => AttributeValue::Double(text.parse().map_err(|_| invalid())?),
            TYPE_STRING => AttributeValue::String(text.to_string()),
            TYPE_VECTOR => AttributeValue::Vector(Vec::new()),
            _ => return Err(invalid()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_keep_full_precision() {
        let v = AttributeValue::Double(0.1 + 0.2);
        let (t, text) = v.encode();
        assert_eq!(AttributeValue::decode(t, text.as_deref()).unwrap(), v);
    }

    #[test]
    fn unknown_type_codes_are_rejected() {
        assert!(AttributeValue::decode(42, Some("x")).is_err());
        assert!(AttributeValue::decode(TYPE_INTEGER, Some("1.5")).is_err());
    }
}
