//! Object definitions.

use crate::field::{FieldType, IddField};

/// Position of a field inside the repeating part of an extensible object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensibleIndex {
    pub group: usize,
    pub field: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IddObject {
    pub(crate) name: String,
    pub(crate) group: String,
    pub(crate) memo: String,
    pub(crate) unique: bool,
    pub(crate) required: bool,
    pub(crate) min_fields: usize,
    pub(crate) format: Option<String>,
    pub(crate) fields: Vec<IddField>,
    /// Fields per extensible group.
    pub(crate) extensible: Option<usize>,
    pub(crate) first_extensible: usize,
}

impl IddObject {
    pub(crate) fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            memo: String::new(),
            unique: false,
            required: false,
            min_fields: 0,
            format: None,
            fields: Vec::new(),
            extensible: None,
            first_extensible: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn min_fields(&self) -> usize {
        self.min_fields
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn has_vertex_format(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("vertices"))
    }

    /// Declared (non-repeated) fields, including one copy of the extensible group.
    pub fn fields(&self) -> &[IddField] {
        &self.fields
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Number of leading fields that never repeat.
    pub fn num_fixed_fields(&self) -> usize {
        if self.extensible.is_some() {
            self.first_extensible
        } else {
            self.fields.len()
        }
    }

    pub fn is_extensible(&self) -> bool {
        self.extensible.is_some()
    }

    pub fn extensible_group_size(&self) -> Option<usize> {
        self.extensible
    }

    /// Field definition at `index`, following extensible groups past the declared end.
    pub fn field(&self, index: usize) -> Option<&IddField> {
        if index < self.fields.len() {
            return self.fields.get(index);
        }
        let n = self.extensible?;
        let offset = (index - self.first_extensible) % n;
        self.fields.get(self.first_extensible + offset)
    }

    pub fn extensible_index(&self, index: usize) -> Option<ExtensibleIndex> {
        let n = self.extensible?;
        if index < self.first_extensible {
            return None;
        }
        let rel = index - self.first_extensible;
        Some(ExtensibleIndex {
            group: rel / n,
            field: rel % n,
        })
    }

    /// Inverse of [`IddObject::extensible_index`].
    pub fn index_of(&self, ext: ExtensibleIndex) -> Option<usize> {
        let n = self.extensible?;
        (ext.field < n).then(|| self.first_extensible + ext.group * n + ext.field)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// The `Name` field, when it is among the first two fields.
    pub fn name_field_index(&self) -> Option<usize> {
        self.fields.iter().take(2).position(IddField::is_name_field)
    }

    pub fn handle_field_index(&self) -> Option<usize> {
        self.fields
            .first()
            .filter(|f| f.field_type == FieldType::Handle)
            .map(|_| 0)
    }

    /// Reference lists this object's name registers in.
    pub fn references(&self) -> &[String] {
        self.name_field_index()
            .and_then(|i| self.fields.get(i))
            .map(|f| f.references.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_referenced_by(&self, object_lists: &[String]) -> bool {
        self.references()
            .iter()
            .any(|r| object_lists.iter().any(|l| l.eq_ignore_ascii_case(r)))
    }

    /// A field count is complete when any extensible group present is full.
    pub fn is_valid_field_count(&self, count: usize) -> bool {
        match self.extensible {
            Some(n) if count > self.first_extensible => (count - self.first_extensible) % n == 0,
            _ => self.extensible.is_some() || count <= self.fields.len(),
        }
    }
}
