//! The workspace: an arena of IDD-typed objects.
//!
//! Objects live in slots addressed by [`ObjectId`]; a removed object leaves an
//! empty slot so ids held elsewhere never alias a different object. Every
//! object also carries a [`Handle`]. Pointer fields store the target's handle,
//! so renaming a target is seen through every pointer and removing it clears them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use os_core::{Handle, ObjectId, ensure_finite, format_real};
use os_idd::{IddFile, IddFileType, IddObject};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{IdfError, IdfResult};
use crate::file::IdfFile;
use crate::naming::{base_name, next_name};
use crate::object::IdfObject;
use crate::validity::{
    DataError, DataErrorType, FieldIssue, StrictnessLevel, ValidityReport, check_field,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Pointer(Handle),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceObject {
    handle: Handle,
    idd_index: usize,
    fields: Vec<FieldValue>,
    comment: Vec<String>,
}

impl WorkspaceObject {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index)
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn comment(&self) -> &[String] {
        &self.comment
    }
}

static EMPTY: FieldValue = FieldValue::Empty;

#[derive(Debug, Clone)]
pub struct Workspace {
    idd_type: IddFileType,
    idd: Arc<IddFile>,
    strictness: StrictnessLevel,
    slots: Vec<Option<WorkspaceObject>>,
    by_handle: HashMap<Handle, ObjectId>,
}

impl Workspace {
    pub fn new(idd_type: IddFileType) -> Self {
        Self::with_strictness(idd_type, StrictnessLevel::Draft)
    }

    pub fn with_strictness(idd_type: IddFileType, strictness: StrictnessLevel) -> Self {
        Self {
            idd_type,
            idd: idd_type.idd(),
            strictness,
            slots: Vec::new(),
            by_handle: HashMap::new(),
        }
    }

    pub fn idd_type(&self) -> IddFileType {
        self.idd_type
    }

    pub fn idd(&self) -> &Arc<IddFile> {
        &self.idd
    }

    pub fn strictness(&self) -> StrictnessLevel {
        self.strictness
    }

    /// Raising the level requires the workspace to already be valid at it.
    pub fn set_strictness(&mut self, level: StrictnessLevel) -> IdfResult<()> {
        if level > self.strictness {
            let report = self.validity_report(level);
            if !report.is_valid() {
                return Err(IdfError::Invalid(report));
            }
        }
        self.strictness = level;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn num_objects(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorkspaceObject> {
        self.slots.get(id.index() as usize).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: ObjectId) -> IdfResult<&mut WorkspaceObject> {
        self.slots
            .get_mut(id.index() as usize)
            .and_then(Option::as_mut)
            .ok_or(IdfError::ObjectNotFound(id))
    }

    fn require(&self, id: ObjectId) -> IdfResult<&WorkspaceObject> {
        self.get(id).ok_or(IdfError::ObjectNotFound(id))
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &WorkspaceObject)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|o| (ObjectId::from_index(i as u32), o)))
    }

    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.objects().map(|(id, _)| id).collect()
    }

    pub fn id_of(&self, handle: Handle) -> Option<ObjectId> {
        self.by_handle.get(&handle).copied()
    }

    pub fn handle(&self, id: ObjectId) -> Option<Handle> {
        self.get(id).map(WorkspaceObject::handle)
    }

    fn schema_of(&self, obj: &WorkspaceObject) -> &IddObject {
        &self.idd.objects()[obj.idd_index]
    }

    pub fn idd_object(&self, id: ObjectId) -> Option<&IddObject> {
        self.get(id).map(|o| self.schema_of(o))
    }

    pub fn type_name(&self, id: ObjectId) -> Option<&str> {
        self.idd_object(id).map(IddObject::name)
    }

    pub fn is_type(&self, id: ObjectId, type_name: &str) -> bool {
        self.type_name(id)
            .is_some_and(|t| t.eq_ignore_ascii_case(type_name))
    }

    pub fn objects_by_type(&self, type_name: &str) -> Vec<ObjectId> {
        let Some(index) = self.schema_index(type_name) else {
            return Vec::new();
        };
        self.objects()
            .filter(|(_, o)| o.idd_index == index)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn objects_by_name(&self, name: &str) -> Vec<ObjectId> {
        self.objects()
            .filter(|(_, o)| self.name_of(o).is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn object_by_type_and_name(&self, type_name: &str, name: &str) -> Option<ObjectId> {
        let index = self.schema_index(type_name)?;
        self.objects()
            .find(|(_, o)| {
                o.idd_index == index && self.name_of(o).is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .map(|(id, _)| id)
    }

    /// Objects whose names register in the reference list `reference`.
    pub fn objects_by_reference(&self, reference: &str) -> Vec<ObjectId> {
        self.objects()
            .filter(|(_, o)| {
                self.schema_of(o)
                    .references()
                    .iter()
                    .any(|r| r.eq_ignore_ascii_case(reference))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn schema_index(&self, type_name: &str) -> Option<usize> {
        let obj = self.idd.get_object(type_name)?;
        self.idd.objects().iter().position(|o| core::ptr::eq(o, obj))
    }

    // ------------------------------------------------------------------
    // Adding and removing
    // ------------------------------------------------------------------

    /// New object of `type_name` with its non-extensible fields present and empty.
    pub fn add_new(&mut self, type_name: &str) -> IdfResult<ObjectId> {
        let idd_obj = self
            .idd
            .get_object(type_name)
            .ok_or_else(|| IdfError::UnknownType(type_name.to_string()))?;
        let fields = vec![String::new(); idd_obj.num_fixed_fields()];
        self.add_object(IdfObject::with_fields(idd_obj.name(), fields))
    }

    pub fn add_object(&mut self, object: IdfObject) -> IdfResult<ObjectId> {
        let ids = self.add_objects(vec![object])?;
        ids.into_iter()
            .next()
            .ok_or_else(|| IdfError::UnknownType(String::new()))
    }

    /// Add a batch. Pointers are resolved once every object of the batch
    /// exists, so objects may refer forward. On any error nothing is added.
    pub fn add_objects(&mut self, objects: Vec<IdfObject>) -> IdfResult<Vec<ObjectId>> {
        let first_slot = self.slots.len();
        let mut added = Vec::with_capacity(objects.len());
        let mut unresolved: Vec<(ObjectId, usize, String)> = Vec::new();

        for object in objects {
            match self.insert_raw(object, &mut unresolved) {
                Ok(id) => added.push(id),
                Err(e) => {
                    self.rollback(first_slot);
                    return Err(e);
                }
            }
        }

        for (id, index, text) in unresolved {
            let Some(lists) = self.field_object_lists(id, index) else {
                continue;
            };
            if let Some(target) = self.resolve_reference(&lists, &text)
                && let Some(handle) = self.handle(target)
                && let Ok(obj) = self.get_mut(id)
            {
                obj.fields[index] = FieldValue::Pointer(handle);
            }
        }

        if self.strictness > StrictnessLevel::None {
            let errors = self.errors_for(&added, self.strictness);
            if !errors.is_empty() {
                self.rollback(first_slot);
                return Err(IdfError::Invalid(ValidityReport {
                    level: self.strictness,
                    errors,
                }));
            }
        }
        debug!(count = added.len(), "added objects to workspace");
        Ok(added)
    }

    fn insert_raw(
        &mut self,
        object: IdfObject,
        unresolved: &mut Vec<(ObjectId, usize, String)>,
    ) -> IdfResult<ObjectId> {
        let idd_index = self
            .schema_index(object.type_name())
            .ok_or_else(|| IdfError::UnknownType(object.type_name().to_string()))?;
        let idd = Arc::clone(&self.idd);
        let schema = &idd.objects()[idd_index];
        let id = ObjectId::from_index(self.slots.len() as u32);

        let has_handle = schema.handle_field_index().is_some();
        let handle = match object.get(0).and_then(Handle::parse) {
            Some(h) if has_handle && !h.is_nil() => {
                if self.by_handle.contains_key(&h) {
                    return Err(IdfError::DuplicateHandle(h));
                }
                h
            }
            _ => Handle::new(),
        };

        let mut fields = Vec::with_capacity(object.num_fields().max(1));
        for (i, text) in object.fields().iter().enumerate() {
            if has_handle && i == 0 {
                fields.push(FieldValue::Text(handle.to_string()));
                continue;
            }
            let text = text.trim();
            if text.is_empty() {
                fields.push(FieldValue::Empty);
            } else {
                if schema.field(i).is_some_and(|f| f.is_pointer()) {
                    unresolved.push((id, i, text.to_string()));
                }
                fields.push(FieldValue::Text(text.to_string()));
            }
        }
        if has_handle && fields.is_empty() {
            fields.push(FieldValue::Text(handle.to_string()));
        }

        self.slots.push(Some(WorkspaceObject {
            handle,
            idd_index,
            fields,
            comment: object.comment().to_vec(),
        }));
        self.by_handle.insert(handle, id);
        Ok(id)
    }

    fn rollback(&mut self, first_slot: usize) {
        for slot in self.slots.drain(first_slot..).flatten() {
            self.by_handle.remove(&slot.handle);
        }
    }

    /// Remove an object and clear every pointer to it.
    pub fn remove_object(&mut self, id: ObjectId) -> IdfResult<()> {
        let removed = self
            .slots
            .get_mut(id.index() as usize)
            .and_then(Option::take)
            .ok_or(IdfError::ObjectNotFound(id))?;
        self.by_handle.remove(&removed.handle);

        let target = FieldValue::Pointer(removed.handle);
        for obj in self.slots.iter_mut().flatten() {
            for field in obj.fields.iter_mut().filter(|f| **f == target) {
                *field = FieldValue::Empty;
            }
        }
        debug!(handle = %removed.handle, "removed object from workspace");
        Ok(())
    }

    pub fn remove_objects(&mut self, ids: &[ObjectId]) -> IdfResult<()> {
        for &id in ids {
            if self.contains(id) {
                self.remove_object(id)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Field access
    // ------------------------------------------------------------------

    pub fn get_field(&self, id: ObjectId, index: usize) -> Option<&FieldValue> {
        self.get(id).and_then(|o| o.field(index))
    }

    pub fn is_empty_field(&self, id: ObjectId, index: usize) -> bool {
        self.get_field(id, index).is_none_or(FieldValue::is_empty)
    }

    /// Field as text; pointers read as the target's name (or handle if unnamed).
    pub fn get_string(&self, id: ObjectId, index: usize) -> Option<String> {
        match self.get_field(id, index)? {
            FieldValue::Empty => None,
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Pointer(h) => Some(self.pointer_text(*h, true)),
        }
    }

    /// As [`Workspace::get_string`], falling back to the schema default.
    pub fn get_string_or_default(&self, id: ObjectId, index: usize) -> Option<String> {
        self.get_string(id, index).or_else(|| {
            self.idd_object(id)
                .and_then(|o| o.field(index))
                .and_then(|f| f.default.clone())
        })
    }

    pub fn get_double(&self, id: ObjectId, index: usize) -> Option<f64> {
        self.get_string(id, index)?.trim().parse().ok()
    }

    pub fn get_double_or_default(&self, id: ObjectId, index: usize) -> Option<f64> {
        self.get_string_or_default(id, index)?.trim().parse().ok()
    }

    pub fn get_int(&self, id: ObjectId, index: usize) -> Option<i64> {
        let v = self.get_double(id, index)?;
        (v.fract() == 0.0).then_some(v as i64)
    }

    pub fn get_int_or_default(&self, id: ObjectId, index: usize) -> Option<i64> {
        let v = self.get_double_or_default(id, index)?;
        (v.fract() == 0.0).then_some(v as i64)
    }

    /// Set a field from text. Pointer fields accept a handle or a target name.
    pub fn set_string(&mut self, id: ObjectId, index: usize, value: &str) -> IdfResult<()> {
        let value = value.trim();
        let new_value = if value.is_empty() {
            FieldValue::Empty
        } else {
            match self.field_object_lists(id, index) {
                Some(lists) => match self.resolve_reference(&lists, value) {
                    Some(target) => FieldValue::Pointer(self.require(target)?.handle),
                    None => FieldValue::Text(value.to_string()),
                },
                None => FieldValue::Text(value.to_string()),
            }
        };
        self.set_field(id, index, new_value)
    }

    pub fn set_double(&mut self, id: ObjectId, index: usize, value: f64) -> IdfResult<()> {
        let value = ensure_finite(value, "field value")?;
        self.set_string(id, index, &format_real(value))
    }

    pub fn set_int(&mut self, id: ObjectId, index: usize, value: i64) -> IdfResult<()> {
        self.set_string(id, index, &value.to_string())
    }

    pub fn set_empty(&mut self, id: ObjectId, index: usize) -> IdfResult<()> {
        self.set_field(id, index, FieldValue::Empty)
    }

    pub fn set_pointer(&mut self, id: ObjectId, index: usize, target: ObjectId) -> IdfResult<()> {
        let handle = self.require(target)?.handle;
        if self.field_object_lists(id, index).is_none() {
            return Err(IdfError::FieldIndex {
                object_type: self.type_name(id).unwrap_or_default().to_string(),
                index,
            });
        }
        self.set_field(id, index, FieldValue::Pointer(handle))
    }

    pub fn get_target(&self, id: ObjectId, index: usize) -> Option<ObjectId> {
        match self.get_field(id, index)? {
            FieldValue::Pointer(h) => self.id_of(*h),
            _ => None,
        }
    }

    /// Objects this object points to, in field order.
    pub fn targets(&self, id: ObjectId) -> Vec<ObjectId> {
        let Some(obj) = self.get(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for field in &obj.fields {
            if let FieldValue::Pointer(h) = field
                && let Some(t) = self.id_of(*h)
                && !out.contains(&t)
            {
                out.push(t);
            }
        }
        out
    }

    /// Objects pointing at `id`.
    pub fn sources(&self, id: ObjectId) -> Vec<ObjectId> {
        let Some(handle) = self.handle(id) else {
            return Vec::new();
        };
        let target = FieldValue::Pointer(handle);
        self.objects()
            .filter(|(_, o)| o.fields.contains(&target))
            .map(|(sid, _)| sid)
            .collect()
    }

    pub fn sources_of_type(&self, id: ObjectId, type_name: &str) -> Vec<ObjectId> {
        self.sources(id)
            .into_iter()
            .filter(|&s| self.is_type(s, type_name))
            .collect()
    }

    /// Sources that point at `id` through field `index`.
    pub fn sources_via_field(&self, id: ObjectId, type_name: &str, index: usize) -> Vec<ObjectId> {
        let Some(handle) = self.handle(id) else {
            return Vec::new();
        };
        self.objects_by_type(type_name)
            .into_iter()
            .filter(|&s| self.get_field(s, index) == Some(&FieldValue::Pointer(handle)))
            .collect()
    }

    fn set_field(&mut self, id: ObjectId, index: usize, value: FieldValue) -> IdfResult<()> {
        let idd = Arc::clone(&self.idd);
        let obj = self.require(id)?;
        let schema = &idd.objects()[obj.idd_index];
        let type_name = schema.name().to_string();

        if schema.handle_field_index() == Some(index) {
            return Err(IdfError::ReadOnlyField {
                object_type: type_name,
                index,
            });
        }
        let growable = index < schema.num_fixed_fields();
        if index >= obj.fields.len() && !growable {
            return Err(IdfError::FieldIndex {
                object_type: type_name,
                index,
            });
        }
        let field = schema.field(index).ok_or(IdfError::FieldIndex {
            object_type: type_name.clone(),
            index,
        })?;

        let target_ok = self.pointer_check(&value, &field.object_lists);
        if let Some(issue) = check_field(field, &value, target_ok, self.strictness) {
            return Err(IdfError::Rejected(self.data_error(id, obj, Some(index), issue)));
        }
        if self.strictness >= StrictnessLevel::Draft
            && schema.name_field_index() == Some(index)
            && let FieldValue::Text(name) = &value
            && let Some(other) = self.conflicting_object(id, name)
        {
            let issue = FieldIssue {
                kind: DataErrorType::NameConflict,
                message: format!(
                    "'{name}' is already used by a {}",
                    self.type_name(other).unwrap_or_default()
                ),
            };
            return Err(IdfError::Rejected(self.data_error(id, obj, Some(index), issue)));
        }

        let obj = self.get_mut(id)?;
        if index >= obj.fields.len() {
            obj.fields.resize(index + 1, FieldValue::Empty);
        }
        obj.fields[index] = value;
        Ok(())
    }

    fn field_object_lists(&self, id: ObjectId, index: usize) -> Option<Vec<String>> {
        let field = self.idd_object(id)?.field(index)?;
        field.is_pointer().then(|| field.object_lists.clone())
    }

    /// Handle text or a name registered in one of `object_lists`.
    fn resolve_reference(&self, object_lists: &[String], text: &str) -> Option<ObjectId> {
        if let Some(h) = Handle::parse(text) {
            return self.id_of(h);
        }
        self.objects()
            .find(|(_, o)| {
                self.schema_of(o).is_referenced_by(object_lists)
                    && self.name_of(o).is_some_and(|n| n.eq_ignore_ascii_case(text))
            })
            .map(|(id, _)| id)
    }

    fn pointer_check(&self, value: &FieldValue, object_lists: &[String]) -> Option<bool> {
        match value {
            FieldValue::Pointer(h) => self
                .get(self.id_of(*h)?)
                .map(|t| self.schema_of(t).is_referenced_by(object_lists)),
            _ => None,
        }
    }

    fn pointer_text(&self, handle: Handle, prefer_name: bool) -> String {
        match self.id_of(handle).and_then(|t| self.get(t)) {
            Some(target) if prefer_name => self
                .name_of(target)
                .map_or_else(|| handle.to_string(), str::to_string),
            Some(_) => handle.to_string(),
            None => String::new(),
        }
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    fn name_of<'a>(&'a self, obj: &'a WorkspaceObject) -> Option<&'a str> {
        let index = self.schema_of(obj).name_field_index()?;
        obj.fields.get(index)?.as_text()
    }

    pub fn name(&self, id: ObjectId) -> Option<&str> {
        self.get(id).and_then(|o| self.name_of(o))
    }

    pub fn set_name(&mut self, id: ObjectId, name: &str) -> IdfResult<()> {
        let index = self
            .idd_object(id)
            .ok_or(IdfError::ObjectNotFound(id))?
            .name_field_index()
            .ok_or_else(|| IdfError::FieldIndex {
                object_type: self.type_name(id).unwrap_or_default().to_string(),
                index: 0,
            })?;
        self.set_string(id, index, name)
    }

    /// Set `name`, or the next free `base N` when another object already uses it.
    /// Returns the name that was set.
    pub fn set_unique_name(&mut self, id: ObjectId, name: &str) -> IdfResult<String> {
        let name = name.trim();
        let unique = if self.conflicting_object(id, name).is_some() {
            let type_name = self.type_name(id).unwrap_or_default().to_string();
            self.next_name_for(&type_name, base_name(name), false)
        } else {
            name.to_string()
        };
        self.set_name(id, &unique)?;
        Ok(unique)
    }

    /// Next `base N` not used by objects sharing reference lists with `type_name`.
    pub fn next_name_for(&self, type_name: &str, base: &str, fill_in: bool) -> String {
        let Some(schema) = self.idd.get_object(type_name) else {
            return next_name(base, std::iter::empty(), fill_in);
        };
        let refs = schema.references();
        let names = self
            .objects()
            .filter(|(_, o)| {
                let s = self.schema_of(o);
                core::ptr::eq(s, schema) || (!refs.is_empty() && s.is_referenced_by(refs))
            })
            .filter_map(|(_, o)| self.name_of(o));
        next_name(base, names, fill_in)
    }

    /// Another object with the same name in an overlapping reference list.
    fn conflicting_object(&self, id: ObjectId, name: &str) -> Option<ObjectId> {
        let refs = self.idd_object(id)?.references();
        if refs.is_empty() {
            return None;
        }
        self.objects()
            .find(|(other, o)| {
                *other != id
                    && self.schema_of(o).is_referenced_by(refs)
                    && self.name_of(o).is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .map(|(other, _)| other)
    }

    // ------------------------------------------------------------------
    // Extensible groups
    // ------------------------------------------------------------------

    pub fn num_extensible_groups(&self, id: ObjectId) -> usize {
        let (Some(obj), Some(schema)) = (self.get(id), self.idd_object(id)) else {
            return 0;
        };
        match schema.extensible_group_size() {
            Some(n) => obj.fields.len().saturating_sub(schema.num_fixed_fields()) / n,
            None => 0,
        }
    }

    /// Field values of group `group`, pointers read as names.
    pub fn extensible_group(&self, id: ObjectId, group: usize) -> Option<Vec<Option<String>>> {
        let schema = self.idd_object(id)?;
        let n = schema.extensible_group_size()?;
        if group >= self.num_extensible_groups(id) {
            return None;
        }
        let start = schema.num_fixed_fields() + group * n;
        Some((start..start + n).map(|i| self.get_string(id, i)).collect())
    }

    /// Append a group; returns its index. Values are checked like [`Workspace::set_string`].
    pub fn push_extensible_group(&mut self, id: ObjectId, values: &[&str]) -> IdfResult<usize> {
        let idd = Arc::clone(&self.idd);
        let schema = self
            .idd_object(id)
            .and_then(|o| idd.get_object(o.name()))
            .ok_or(IdfError::ObjectNotFound(id))?;
        let n = schema.extensible_group_size().ok_or_else(|| IdfError::FieldIndex {
            object_type: schema.name().to_string(),
            index: schema.num_fields(),
        })?;
        if values.len() != n {
            return Err(IdfError::FieldIndex {
                object_type: schema.name().to_string(),
                index: schema.num_fixed_fields() + values.len(),
            });
        }

        let group = self.num_extensible_groups(id);
        let start = schema.num_fixed_fields() + group * n;
        let original_len = self.require(id)?.fields.len();
        {
            let obj = self.get_mut(id)?;
            obj.fields.resize(start + n, FieldValue::Empty);
        }
        for (offset, value) in values.iter().enumerate() {
            if let Err(e) = self.set_string(id, start + offset, value) {
                self.get_mut(id)?.fields.truncate(original_len);
                return Err(e);
            }
        }
        Ok(group)
    }

    pub fn erase_extensible_group(&mut self, id: ObjectId, group: usize) -> IdfResult<()> {
        let schema = self.idd_object(id).ok_or(IdfError::ObjectNotFound(id))?;
        let (Some(n), fixed) = (schema.extensible_group_size(), schema.num_fixed_fields()) else {
            return Ok(());
        };
        if group >= self.num_extensible_groups(id) {
            return Ok(());
        }
        let start = fixed + group * n;
        self.get_mut(id)?.fields.drain(start..start + n);
        Ok(())
    }

    pub fn clear_extensible_groups(&mut self, id: ObjectId) -> IdfResult<()> {
        let fixed = self
            .idd_object(id)
            .ok_or(IdfError::ObjectNotFound(id))?
            .num_fixed_fields();
        let obj = self.get_mut(id)?;
        if obj.fields.len() > fixed {
            obj.fields.truncate(fixed);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Validity
    // ------------------------------------------------------------------

    fn data_error(
        &self,
        id: ObjectId,
        obj: &WorkspaceObject,
        field: Option<usize>,
        issue: FieldIssue,
    ) -> DataError {
        DataError {
            kind: issue.kind,
            object: Some(id),
            object_type: self.schema_of(obj).name().to_string(),
            object_name: self.name_of(obj).map(str::to_string),
            field,
            message: issue.message,
        }
    }

    fn check_object(
        &self,
        id: ObjectId,
        obj: &WorkspaceObject,
        level: StrictnessLevel,
    ) -> Vec<DataError> {
        let schema = self.schema_of(obj);
        let mut errors = Vec::new();

        if level >= DataErrorType::NumberOfFields.level()
            && !schema.is_valid_field_count(obj.fields.len())
        {
            let issue = FieldIssue {
                kind: DataErrorType::NumberOfFields,
                message: format!("{} fields do not fit the schema", obj.fields.len()),
            };
            errors.push(self.data_error(id, obj, None, issue));
        }

        let mut count = obj.fields.len();
        if level >= StrictnessLevel::Final {
            count = count.max(schema.num_fixed_fields());
        }
        for index in 0..count {
            if schema.handle_field_index() == Some(index) {
                continue;
            }
            let Some(field) = schema.field(index) else {
                continue;
            };
            let value = obj.fields.get(index).unwrap_or(&EMPTY);
            let target_ok = self.pointer_check(value, &field.object_lists);
            if let Some(issue) = check_field(field, value, target_ok, level) {
                errors.push(self.data_error(id, obj, Some(index), issue));
            }
        }
        errors
    }

    /// Object and collection errors concerning `ids`.
    fn errors_for(&self, ids: &[ObjectId], level: StrictnessLevel) -> Vec<DataError> {
        let mut errors: Vec<DataError> = ids
            .par_iter()
            .filter_map(|&id| self.get(id).map(|o| (id, o)))
            .flat_map_iter(|(id, o)| self.check_object(id, o, level))
            .collect();
        if level >= StrictnessLevel::Draft {
            errors.extend(self.name_conflicts(Some(ids)));
        }
        if level >= StrictnessLevel::Final {
            errors.extend(
                self.unique_violations()
                    .into_iter()
                    .filter(|e| e.object.is_some_and(|o| ids.contains(&o))),
            );
        }
        errors
    }

    fn name_conflicts(&self, only: Option<&[ObjectId]>) -> Vec<DataError> {
        let mut by_name: HashMap<String, Vec<(ObjectId, &WorkspaceObject)>> = HashMap::new();
        for (id, obj) in self.objects() {
            if self.schema_of(obj).references().is_empty() {
                continue;
            }
            if let Some(name) = self.name_of(obj) {
                by_name
                    .entry(name.to_ascii_lowercase())
                    .or_default()
                    .push((id, obj));
            }
        }

        let mut errors = Vec::new();
        for group in by_name.values().filter(|g| g.len() > 1) {
            for &(id, obj) in group {
                if only.is_some_and(|ids| !ids.contains(&id)) {
                    continue;
                }
                let refs = self.schema_of(obj).references();
                let clash = group
                    .iter()
                    .any(|&(other, o)| other != id && self.schema_of(o).is_referenced_by(refs));
                if clash {
                    let issue = FieldIssue {
                        kind: DataErrorType::NameConflict,
                        message: "name is shared with another object of an overlapping reference list"
                            .to_string(),
                    };
                    let index = self.schema_of(obj).name_field_index();
                    errors.push(self.data_error(id, obj, index, issue));
                }
            }
        }
        errors.sort_by_key(|e| e.object);
        errors
    }

    fn unique_violations(&self) -> Vec<DataError> {
        let mut counts: HashMap<usize, Vec<ObjectId>> = HashMap::new();
        for (id, obj) in self.objects() {
            if self.schema_of(obj).is_unique() {
                counts.entry(obj.idd_index).or_default().push(id);
            }
        }
        let mut errors = Vec::new();
        for ids in counts.values().filter(|ids| ids.len() > 1) {
            for &id in ids {
                if let Some(obj) = self.get(id) {
                    let issue = FieldIssue {
                        kind: DataErrorType::UniqueObjectDuplicated,
                        message: format!("{} objects of a unique type", ids.len()),
                    };
                    errors.push(self.data_error(id, obj, None, issue));
                }
            }
        }
        errors.sort_by_key(|e| e.object);
        errors
    }

    /// Full report: per-object checks in parallel, then collection checks.
    pub fn validity_report(&self, level: StrictnessLevel) -> ValidityReport {
        let mut errors: Vec<DataError> = self
            .slots
            .par_iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|o| (ObjectId::from_index(i as u32), o)))
            .flat_map_iter(|(id, o)| self.check_object(id, o, level))
            .collect();

        if level >= StrictnessLevel::Draft {
            errors.extend(self.name_conflicts(None));
        }
        if level >= StrictnessLevel::Final {
            errors.extend(self.unique_violations());
            for required in self.idd.required_objects() {
                if self.objects_by_type(required.name()).is_empty() {
                    errors.push(DataError {
                        kind: DataErrorType::RequiredObjectMissing,
                        object: None,
                        object_type: required.name().to_string(),
                        object_name: None,
                        field: None,
                        message: "required object is missing".to_string(),
                    });
                }
            }
        }
        ValidityReport { level, errors }
    }

    pub fn is_valid(&self, level: StrictnessLevel) -> bool {
        self.validity_report(level).is_valid()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Text form of one object. OpenStudio files write pointers as handles,
    /// EnergyPlus files as target names.
    pub fn to_idf_object(&self, id: ObjectId) -> Option<IdfObject> {
        let obj = self.get(id)?;
        let by_name = self.idd_type == IddFileType::EnergyPlus;
        let fields = obj.fields.iter().map(|f| match f {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Pointer(h) => self.pointer_text(*h, by_name),
        });
        let mut out = IdfObject::with_fields(self.schema_of(obj).name(), fields);
        out.set_comment(obj.comment.clone());
        Some(out)
    }

    pub fn to_idf_file(&self) -> IdfFile {
        let mut file = IdfFile::new(self.idd_type);
        for (id, _) in self.objects() {
            if let Some(object) = self.to_idf_object(id) {
                file.add_object(object);
            }
        }
        file
    }

    /// Build a workspace from parsed text. Objects of unknown type are skipped
    /// with a warning; the result must be valid at `strictness`.
    pub fn from_idf_file(file: &IdfFile, strictness: StrictnessLevel) -> IdfResult<Self> {
        let mut ws = Self::with_strictness(file.idd_type(), StrictnessLevel::None);
        let known: Vec<IdfObject> = file
            .objects()
            .iter()
            .filter(|o| {
                let known = ws.idd.get_object(o.type_name()).is_some();
                if !known {
                    warn!(object_type = o.type_name(), "skipping object of unknown type");
                }
                known
            })
            .cloned()
            .collect();
        ws.add_objects(known)?;
        ws.set_strictness(strictness)?;
        Ok(ws)
    }

    pub fn print(&self) -> String {
        self.to_idf_file().print()
    }

    pub fn load(path: &Path, idd_type: IddFileType, strictness: StrictnessLevel) -> IdfResult<Self> {
        let file = IdfFile::load(path, idd_type)?;
        Self::from_idf_file(&file, strictness)
    }

    pub fn save(&self, path: &Path) -> IdfResult<()> {
        self.to_idf_file().save(path)
    }
}
