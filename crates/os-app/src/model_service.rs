//! Loading, saving, translating and checking models in any supported format.

use std::collections::BTreeMap;
use std::path::Path;

use os_core::VersionString;
use os_idf::{IddFileType, IdfFile, StrictnessLevel, ValidityReport};
use os_model::{BuildingStory, LogLevel, LogMessage, Model, Space, SubSurface, Surface, ThermalZone};
use os_osversion::VersionTranslator;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::TranslatorConfig;
use crate::error::{AppError, AppResult};
use crate::format::FileFormat;

/// A model read from disk along with what the reader had to say about it.
#[derive(Debug)]
pub struct LoadedModel {
    pub model: Model,
    pub format: FileFormat,
    pub messages: Vec<LogMessage>,
    /// Version an OSM file was written with, when it had to be updated.
    pub updated_from: Option<VersionString>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub version: String,
    pub object_count: usize,
    pub object_counts: BTreeMap<String, usize>,
    pub stories: usize,
    pub thermal_zones: usize,
    pub spaces: usize,
    pub surfaces: usize,
    pub sub_surfaces: usize,
    pub floor_area_m2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationReport {
    pub input_format: FileFormat,
    pub output_format: FileFormat,
    pub warnings: usize,
    pub errors: usize,
    #[serde(skip)]
    pub messages: Vec<LogMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub original_version: Option<String>,
    pub version: String,
    pub applied_updates: Vec<String>,
    pub deprecated_objects: usize,
    pub refactored_objects: usize,
    pub untranslated_objects: usize,
    pub warnings: Vec<String>,
}

fn translator_messages(warnings: Vec<LogMessage>, errors: Vec<LogMessage>) -> Vec<LogMessage> {
    let mut messages = warnings;
    messages.extend(errors);
    messages
}

/// Reads `path` in whichever format it holds. OSM files older than the
/// current version are updated in memory.
pub fn load_model(path: &Path, config: &TranslatorConfig) -> AppResult<LoadedModel> {
    let format = FileFormat::detect(path)?;
    let (mut model, messages, updated_from) = match format {
        FileFormat::Osm => {
            let mut vt = VersionTranslator::new();
            vt.set_allow_newer_versions(config.allow_newer_versions);
            let model = vt.load_model(path)?;
            let updated_from = vt
                .original_version()
                .filter(|v| !vt.applied_updates().is_empty() || **v > model.version())
                .cloned();
            (model, translator_messages(vt.warnings(), vt.errors()), updated_from)
        }
        FileFormat::Idf => {
            let file = IdfFile::load(path, IddFileType::EnergyPlus)?;
            let mut rt = os_energyplus::ReverseTranslator::new();
            let model = rt.translate_idf_file(&file)?;
            (model, translator_messages(rt.warnings(), rt.errors()), None)
        }
        FileFormat::GbXml => {
            let mut rt = os_gbxml::ReverseTranslator::new();
            rt.set_length_unit_override(config.length_unit()?);
            let model = rt.load_model(path)?;
            (model, translator_messages(rt.warnings(), rt.errors()), None)
        }
        FileFormat::Sdd => {
            let mut rt = os_sdd::ReverseTranslator::new();
            let model = rt.load_model(path)?;
            (model, translator_messages(rt.warnings(), rt.errors()), None)
        }
    };

    if let Some(level) = config.strictness_level()? {
        apply_strictness(&mut model, level)?;
    }
    info!(
        path = %path.display(),
        format = format.as_str(),
        objects = model.workspace().num_objects(),
        "loaded model"
    );
    Ok(LoadedModel {
        model,
        format,
        messages,
        updated_from,
    })
}

fn apply_strictness(model: &mut Model, level: StrictnessLevel) -> AppResult<()> {
    let report = model.workspace().validity_report(level);
    if !report.is_valid() {
        return Err(AppError::Invalid {
            level: level.as_str(),
            count: report.errors.len(),
        });
    }
    model.workspace_mut().set_strictness(level)?;
    Ok(())
}

/// Writes `model` in the format named by the extension of `path`; returns the
/// messages of the forward translation.
pub fn save_model(model: &Model, path: &Path, config: &TranslatorConfig) -> AppResult<Vec<LogMessage>> {
    let format = FileFormat::from_extension(path).ok_or_else(|| AppError::UnknownFormat {
        path: path.to_path_buf(),
    })?;
    let messages = match format {
        FileFormat::Osm => {
            model.save(path)?;
            Vec::new()
        }
        FileFormat::Idf => {
            let mut ft = os_energyplus::ForwardTranslator::with_options(config.forward.clone());
            let ws = ft.translate_model(model)?;
            ws.save(path)?;
            translator_messages(ft.warnings(), ft.errors())
        }
        FileFormat::GbXml => {
            let mut ft = os_gbxml::ForwardTranslator::new();
            ft.model_to_gbxml(model, path)?;
            translator_messages(ft.warnings(), ft.errors())
        }
        FileFormat::Sdd => {
            return Err(AppError::Unsupported {
                message: "writing SDD files".to_string(),
            });
        }
    };
    info!(path = %path.display(), format = format.as_str(), "saved model");
    Ok(messages)
}

/// Reads `input` and writes it back out as `output`.
pub fn translate(input: &Path, output: &Path, config: &TranslatorConfig) -> AppResult<TranslationReport> {
    let loaded = load_model(input, config)?;
    let written = save_model(&loaded.model, output, config)?;
    let mut messages = loaded.messages;
    messages.extend(written);
    let errors = messages
        .iter()
        .filter(|m| m.level == LogLevel::Error)
        .count();
    let warnings = messages
        .iter()
        .filter(|m| m.level == LogLevel::Warn)
        .count();
    if errors > 0 {
        warn!(errors, "translation skipped objects");
    }
    Ok(TranslationReport {
        input_format: loaded.format,
        output_format: FileFormat::from_extension(output).unwrap_or(loaded.format),
        warnings,
        errors,
        messages,
    })
}

/// Brings an OSM file to the current version, writing to `output` or back to `input`.
pub fn update_model(input: &Path, output: Option<&Path>, config: &TranslatorConfig) -> AppResult<UpdateReport> {
    if FileFormat::from_extension(input) != Some(FileFormat::Osm) {
        return Err(AppError::Unsupported {
            message: format!("updating {}; only OSM files carry a version ladder", input.display()),
        });
    }
    let mut vt = VersionTranslator::new();
    vt.set_allow_newer_versions(config.allow_newer_versions);
    let model = vt.load_model(input)?;
    model.save(output.unwrap_or(input))?;
    Ok(UpdateReport {
        original_version: vt.original_version().map(|v| v.to_string()),
        version: model.version().to_string(),
        applied_updates: vt.applied_updates().iter().map(|v| v.to_string()).collect(),
        deprecated_objects: vt.deprecated_objects().len(),
        refactored_objects: vt.refactored_objects().len(),
        untranslated_objects: vt.untranslated_objects().len(),
        warnings: vt.warnings().iter().map(|m| m.message.clone()).collect(),
    })
}

pub fn validate_model(model: &Model, level: StrictnessLevel) -> ValidityReport {
    model.workspace().validity_report(level)
}

pub fn summarize_model(model: &Model) -> ModelSummary {
    let ws = model.workspace();
    let mut object_counts = BTreeMap::new();
    for id in ws.object_ids() {
        if let Some(type_name) = ws.type_name(id) {
            *object_counts.entry(type_name.to_string()).or_insert(0) += 1;
        }
    }
    ModelSummary {
        version: model.version().to_string(),
        object_count: ws.num_objects(),
        object_counts,
        stories: model.objects::<BuildingStory>().len(),
        thermal_zones: model.objects::<ThermalZone>().len(),
        spaces: model.objects::<Space>().len(),
        surfaces: model.objects::<Surface>().len(),
        sub_surfaces: model.objects::<SubSurface>().len(),
        floor_area_m2: model
            .get_building()
            .map(|b| b.floor_area(model))
            .unwrap_or_default(),
    }
}
