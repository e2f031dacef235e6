//! Schema validity checks and strictness levels.

use core::fmt;

use os_core::ObjectId;
use os_idd::{FieldType, IddField};

use crate::workspace::FieldValue;

/// How much of the schema a workspace enforces. Ordered from lax to strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StrictnessLevel {
    None,
    Minimal,
    #[default]
    Draft,
    Final,
}

impl StrictnessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            StrictnessLevel::None => "none",
            StrictnessLevel::Minimal => "minimal",
            StrictnessLevel::Draft => "draft",
            StrictnessLevel::Final => "final",
        }
    }
}

impl core::str::FromStr for StrictnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(StrictnessLevel::None),
            "minimal" => Ok(StrictnessLevel::Minimal),
            "draft" => Ok(StrictnessLevel::Draft),
            "final" => Ok(StrictnessLevel::Final),
            other => Err(format!("unknown strictness level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataErrorType {
    DataType,
    NumericBound,
    InvalidChoice,
    NumberOfFields,
    PointerType,
    DanglingPointer,
    NullAndRequired,
    NameConflict,
    UniqueObjectDuplicated,
    RequiredObjectMissing,
}

impl DataErrorType {
    /// Lowest strictness at which this error is reported.
    pub fn level(self) -> StrictnessLevel {
        match self {
            DataErrorType::DataType | DataErrorType::NumberOfFields => StrictnessLevel::Minimal,
            DataErrorType::NumericBound
            | DataErrorType::InvalidChoice
            | DataErrorType::PointerType
            | DataErrorType::DanglingPointer
            | DataErrorType::NameConflict => StrictnessLevel::Draft,
            DataErrorType::NullAndRequired
            | DataErrorType::UniqueObjectDuplicated
            | DataErrorType::RequiredObjectMissing => StrictnessLevel::Final,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataError {
    pub kind: DataErrorType,
    pub object: Option<ObjectId>,
    pub object_type: String,
    pub object_name: Option<String>,
    pub field: Option<usize>,
    pub message: String,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} in {}", self.kind, self.object_type)?;
        if let Some(name) = &self.object_name {
            write!(f, " '{name}'")?;
        }
        if let Some(field) = self.field {
            write!(f, " field {field}")?;
        }
        write!(f, ": {}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidityReport {
    pub level: StrictnessLevel,
    pub errors: Vec<DataError>,
}

impl ValidityReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn count(&self, kind: DataErrorType) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }
}

impl fmt::Display for ValidityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Validity report at {} strictness: {} error(s)",
            self.level.as_str(),
            self.errors.len()
        )?;
        for e in &self.errors {
            writeln!(f, "  {e}")?;
        }
        Ok(())
    }
}

/// Problem with one field value, independent of which object holds it.
pub(crate) struct FieldIssue {
    pub kind: DataErrorType,
    pub message: String,
}

impl FieldIssue {
    fn new(kind: DataErrorType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks of a single value against its field definition.
///
/// `target_ok` tells, for pointers, whether the target exists and whether its
/// reference lists match: `None` for a missing target.
pub(crate) fn check_field(
    field: &IddField,
    value: &FieldValue,
    target_ok: Option<bool>,
    level: StrictnessLevel,
) -> Option<FieldIssue> {
    let issue = match value {
        FieldValue::Empty => field.required.then(|| {
            FieldIssue::new(
                DataErrorType::NullAndRequired,
                format!("'{}' is required", field.name),
            )
        }),
        FieldValue::Pointer(_) => match target_ok {
            None => Some(FieldIssue::new(
                DataErrorType::DanglingPointer,
                format!("'{}' points to a missing object", field.name),
            )),
            Some(false) => Some(FieldIssue::new(
                DataErrorType::PointerType,
                format!(
                    "'{}' must point to one of {}",
                    field.name,
                    field.object_lists.join(", ")
                ),
            )),
            Some(true) => None,
        },
        FieldValue::Text(text) => check_text(field, text),
    };
    issue.filter(|i| i.kind.level() <= level)
}

fn check_text(field: &IddField, text: &str) -> Option<FieldIssue> {
    match field.field_type {
        FieldType::Real | FieldType::Integer => {
            if field.accepts_auto(text) {
                return None;
            }
            let Ok(v) = text.trim().parse::<f64>() else {
                return Some(FieldIssue::new(
                    DataErrorType::DataType,
                    format!("'{}' is not a number: '{text}'", field.name),
                ));
            };
            if !v.is_finite() || (field.field_type == FieldType::Integer && v.fract() != 0.0) {
                return Some(FieldIssue::new(
                    DataErrorType::DataType,
                    format!("'{}' expects {}: '{text}'", field.name, field.field_type),
                ));
            }
            if let Some(min) = field.minimum
                && !min.allows_above(v)
            {
                return Some(FieldIssue::new(
                    DataErrorType::NumericBound,
                    format!("'{}' = {v} is below {}", field.name, min.value),
                ));
            }
            if let Some(max) = field.maximum
                && !max.allows_below(v)
            {
                return Some(FieldIssue::new(
                    DataErrorType::NumericBound,
                    format!("'{}' = {v} is above {}", field.name, max.value),
                ));
            }
            None
        }
        FieldType::Choice => field.key(text).is_none().then(|| {
            FieldIssue::new(
                DataErrorType::InvalidChoice,
                format!("'{text}' is not a valid key for '{}'", field.name),
            )
        }),
        FieldType::ObjectList => Some(FieldIssue::new(
            DataErrorType::DanglingPointer,
            format!("'{}' refers to unknown object '{text}'", field.name),
        )),
        _ => None,
    }
}
