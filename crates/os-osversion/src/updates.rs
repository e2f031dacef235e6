//! Per-version updates of OSM objects.
//!
//! Each update takes the objects as written by the previous version and
//! returns them as the target version expects. Updates never touch the
//! version object; the translator stamps it after each step.

use os_idf::IdfObject;

/// Update from the previous version to the one it is registered under.
pub type UpdateFn = fn(Vec<IdfObject>, &mut UpdateRecord) -> Vec<IdfObject>;

/// An object before and after an update rewrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct RefactoredObject {
    pub old: IdfObject,
    pub new: IdfObject,
}

/// What the updates changed, accumulated across steps.
#[derive(Debug, Clone, Default)]
pub struct UpdateRecord {
    pub deprecated: Vec<IdfObject>,
    pub refactored: Vec<RefactoredObject>,
    pub new_objects: Vec<IdfObject>,
}

impl UpdateRecord {
    pub fn clear(&mut self) {
        self.deprecated.clear();
        self.refactored.clear();
        self.new_objects.clear();
    }

    fn refactor(&mut self, old: IdfObject, new: IdfObject) -> IdfObject {
        self.refactored.push(RefactoredObject {
            old,
            new: new.clone(),
        });
        new
    }
}

/// Only bumps the version.
pub fn default_update(objects: Vec<IdfObject>, _record: &mut UpdateRecord) -> Vec<IdfObject> {
    objects
}

const SCHEDULE_DAY_INTERPOLATE: usize = 3;
const SPACE_PART_OF_TOTAL_FLOOR_AREA: usize = 8;

/// Interpolation becomes a choice: `Yes` turns into `Average`. Component
/// tag and attribute objects are dropped.
pub fn update_0_9_x_to_1_0_0(objects: Vec<IdfObject>, record: &mut UpdateRecord) -> Vec<IdfObject> {
    let mut out = Vec::with_capacity(objects.len());
    for object in objects {
        let type_name = object.type_name();
        if type_name.eq_ignore_ascii_case("OS:ComponentData:Tags")
            || type_name.eq_ignore_ascii_case("OS:ComponentData:Attributes")
        {
            record.deprecated.push(object);
            continue;
        }
        let interpolates = type_name.eq_ignore_ascii_case("OS:Schedule:Day")
            && object
                .get(SCHEDULE_DAY_INTERPOLATE)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("Yes"));
        if interpolates {
            let mut updated = object.clone();
            updated.set(SCHEDULE_DAY_INTERPOLATE, "Average");
            out.push(record.refactor(object, updated));
        } else {
            out.push(object);
        }
    }
    out
}

/// Spaces gain *Part of Total Floor Area*, written out as `Yes`.
pub fn update_1_0_x_to_1_1_0(objects: Vec<IdfObject>, record: &mut UpdateRecord) -> Vec<IdfObject> {
    objects
        .into_iter()
        .map(|object| {
            let missing = object.type_name().eq_ignore_ascii_case("OS:Space")
                && object
                    .get(SPACE_PART_OF_TOTAL_FLOOR_AREA)
                    .is_none_or(|v| v.trim().is_empty());
            if !missing {
                return object;
            }
            let mut updated = object.clone();
            updated.set(SPACE_PART_OF_TOTAL_FLOOR_AREA, "Yes");
            record.refactor(object, updated)
        })
        .collect()
}

/// Simple glazing becomes a glazing system; fields are unchanged.
pub fn update_1_1_x_to_1_2_0(objects: Vec<IdfObject>, record: &mut UpdateRecord) -> Vec<IdfObject> {
    objects
        .into_iter()
        .map(|object| {
            if !object
                .type_name()
                .eq_ignore_ascii_case("OS:WindowMaterial:SimpleGlazing")
            {
                return object;
            }
            let mut updated = IdfObject::with_fields(
                "OS:WindowMaterial:SimpleGlazingSystem",
                object.fields().iter().cloned(),
            );
            updated.set_comment(object.comment().to_vec());
            record.refactor(object, updated)
        })
        .collect()
}
