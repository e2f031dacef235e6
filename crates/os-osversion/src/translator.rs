use std::path::Path;

use os_core::VersionString;
use os_idf::{IddFileType, IdfFile, IdfObject, StrictnessLevel, Workspace};
use os_model::{LogMessage, Model, TranslationLog};
use tracing::{debug, info};

use crate::error::{VersionError, VersionResult};
use crate::updates::{
    RefactoredObject, UpdateFn, UpdateRecord, default_update, update_0_9_x_to_1_0_0,
    update_1_0_x_to_1_1_0, update_1_1_x_to_1_2_0,
};

const CHANNEL: &str = "os_osversion";

/// Brings OSM text written by an older release up to the current schema.
///
/// The ladder lists every known version in order; a version with no
/// registered update passes its objects through unchanged.
#[derive(Debug)]
pub struct VersionTranslator {
    allow_newer_versions: bool,
    ladder: Vec<(VersionString, UpdateFn)>,
    original_version: Option<VersionString>,
    applied: Vec<VersionString>,
    untranslated: Vec<IdfObject>,
    record: UpdateRecord,
    log: TranslationLog,
}

impl Default for VersionTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionTranslator {
    pub fn new() -> Self {
        let ladder = [
            ("0.9.0", default_update as UpdateFn),
            ("0.9.1", default_update),
            ("1.0.0", update_0_9_x_to_1_0_0),
            ("1.0.1", default_update),
            ("1.1.0", update_1_0_x_to_1_1_0),
            ("1.1.1", default_update),
            ("1.2.0", update_1_1_x_to_1_2_0),
        ]
        .into_iter()
        .filter_map(|(v, f)| Some((v.parse().ok()?, f)))
        .collect();
        Self {
            allow_newer_versions: true,
            ladder,
            original_version: None,
            applied: Vec::new(),
            untranslated: Vec::new(),
            record: UpdateRecord::default(),
            log: TranslationLog::default(),
        }
    }

    pub fn allow_newer_versions(&self) -> bool {
        self.allow_newer_versions
    }

    /// When allowed, a file one release ahead is read as the current version.
    pub fn set_allow_newer_versions(&mut self, allow: bool) {
        self.allow_newer_versions = allow;
    }

    /// Version the last translated file declared.
    pub fn original_version(&self) -> Option<&VersionString> {
        self.original_version.as_ref()
    }

    /// Target versions of the steps run by the last translation, in order.
    pub fn applied_updates(&self) -> &[VersionString] {
        &self.applied
    }

    pub fn deprecated_objects(&self) -> &[IdfObject] {
        &self.record.deprecated
    }

    pub fn refactored_objects(&self) -> &[RefactoredObject] {
        &self.record.refactored
    }

    pub fn new_objects(&self) -> &[IdfObject] {
        &self.record.new_objects
    }

    /// Objects whose type the current schema no longer knows; not in the result.
    pub fn untranslated_objects(&self) -> &[IdfObject] {
        &self.untranslated
    }

    pub fn warnings(&self) -> Vec<LogMessage> {
        self.log.warnings()
    }

    pub fn errors(&self) -> Vec<LogMessage> {
        self.log.errors()
    }

    pub fn load_model(&mut self, path: &Path) -> VersionResult<Model> {
        let text = std::fs::read_to_string(path)?;
        self.update_version(&text)
    }

    pub fn update_version(&mut self, text: &str) -> VersionResult<Model> {
        self.original_version = None;
        self.applied.clear();
        self.untranslated.clear();
        self.record.clear();
        self.log.clear();

        let file = IdfFile::parse(text, IddFileType::OpenStudio)?;
        let found = file.version().ok_or(VersionError::MissingVersion)?;
        self.original_version = Some(found.clone());
        let current = current_version()?;
        let start = self.bracket(found, &current)?;
        info!(from = %start, to = %current, "updating model version");

        let objects_start = file.objects().len();
        let header = file.header().to_vec();
        let mut objects = file.into_objects();
        for (target, update) in &self.ladder {
            if *target <= start || *target > current {
                continue;
            }
            objects = update(objects, &mut self.record);
            stamp_version(&mut objects, target);
            debug!(version = %target, objects = objects.len(), "applied update");
            self.applied.push(target.clone());
        }
        stamp_version(&mut objects, &current);

        let idd = IddFileType::OpenStudio.idd();
        let mut updated = IdfFile::new(IddFileType::OpenStudio);
        updated.set_header(header);
        for object in objects {
            if idd.get_object(object.type_name()).is_some() {
                updated.add_object(object);
            } else {
                self.log.warn(
                    CHANNEL,
                    format!("Object type '{}' is not in the current schema; dropped", object.type_name()),
                );
                self.untranslated.push(object);
            }
        }

        let expected = objects_start + self.record.new_objects.len()
            - self.record.deprecated.len()
            - self.untranslated.len();
        if updated.objects().len() != expected {
            self.log.warn(
                CHANNEL,
                format!(
                    "Expected {expected} objects after updating, found {}",
                    updated.objects().len()
                ),
            );
        }

        let ws = Workspace::from_idf_file(&updated, StrictnessLevel::None)?;
        Ok(Model::from_workspace(ws)?)
    }

    /// Version updates start from; errors when the file cannot be updated.
    fn bracket(&mut self, found: VersionString, current: &VersionString) -> VersionResult<VersionString> {
        if let Some((oldest, _)) = self.ladder.first()
            && found < *oldest
        {
            return Err(VersionError::TooOld {
                found,
                oldest: oldest.clone(),
            });
        }
        if found <= *current {
            return Ok(found);
        }
        if self.allow_newer_versions && is_next_version(current, &found) {
            self.log.warn(
                CHANNEL,
                format!(
                    "Version {found} is one increment ahead of {current}; read as {current}"
                ),
            );
            return Ok(current.clone());
        }
        Err(VersionError::TooNew {
            found,
            current: current.clone(),
        })
    }
}

pub fn current_version() -> VersionResult<VersionString> {
    Ok(IddFileType::OpenStudio.idd().version().parse()?)
}

/// `candidate` is the next patch, minor or major release after `current`.
fn is_next_version(current: &VersionString, candidate: &VersionString) -> bool {
    let (major, minor, patch) = (current.major(), current.minor(), current.patch().unwrap_or(0));
    let next = [
        VersionString::new(major, minor, patch + 1),
        VersionString::new(major, minor + 1, 0),
        VersionString::new(major + 1, 0, 0),
    ];
    next.contains(candidate)
}

fn stamp_version(objects: &mut [IdfObject], version: &VersionString) {
    let version_type = IddFileType::OpenStudio.version_type();
    if let Some(object) = objects
        .iter_mut()
        .find(|o| o.type_name().eq_ignore_ascii_case(version_type))
    {
        object.set(1, version.to_string());
    }
}
