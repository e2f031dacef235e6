//! Translator settings read from YAML.
//!
//! ```yaml
//! version: 1
//! strictness: draft
//! allow_newer_versions: true
//! gbxml_length_unit: feet
//! forward:
//!   exclude_sqlite_output_report: false
//!   ip_tabular_output: true
//! ```

use std::path::Path;

use os_core::units::LengthUnit;
use os_energyplus::ForwardTranslatorOptions;
use os_idf::StrictnessLevel;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub version: u32,
    /// Strictness a loaded model is raised to; unset keeps the model default.
    pub strictness: Option<String>,
    /// Read OSM files written by the next release.
    pub allow_newer_versions: bool,
    /// Replaces the length unit declared in gbXML documents.
    pub gbxml_length_unit: Option<String>,
    pub forward: ForwardTranslatorOptions,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            strictness: None,
            allow_newer_versions: true,
            gbxml_length_unit: None,
            forward: ForwardTranslatorOptions::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn strictness_level(&self) -> AppResult<Option<StrictnessLevel>> {
        self.strictness
            .as_deref()
            .map(|s| s.parse::<StrictnessLevel>().map_err(AppError::Config))
            .transpose()
    }

    pub fn length_unit(&self) -> AppResult<Option<LengthUnit>> {
        self.gbxml_length_unit
            .as_deref()
            .map(|s| {
                s.parse::<LengthUnit>()
                    .map_err(|e| AppError::Config(e.to_string()))
            })
            .transpose()
    }

    /// Checks every field that is stored as text.
    pub fn validate(&self) -> AppResult<()> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(AppError::Config(format!(
                "config version {} is not supported (expected {CONFIG_VERSION})",
                self.version
            )));
        }
        self.strictness_level()?;
        self.length_unit()?;
        Ok(())
    }
}

pub fn load_config(path: &Path) -> AppResult<TranslatorConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: TranslatorConfig = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {e}")))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &TranslatorConfig) -> AppResult<()> {
    config.validate()?;
    let content = serde_yaml::to_string(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize config: {e}")))?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: TranslatorConfig =
            serde_yaml::from_str("forward:\n  ip_tabular_output: true\n").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.allow_newer_versions);
        assert!(config.forward.ip_tabular_output);
        assert!(!config.forward.exclude_sqlite_output_report);
        assert_eq!(config.strictness_level().unwrap(), None);
    }

    #[test]
    fn text_fields_are_checked() {
        let config = TranslatorConfig {
            strictness: Some("Final".into()),
            gbxml_length_unit: Some("Feet".into()),
            ..TranslatorConfig::default()
        };
        assert_eq!(config.strictness_level().unwrap(), Some(StrictnessLevel::Final));
        assert_eq!(config.length_unit().unwrap(), Some(LengthUnit::Feet));

        let bad = TranslatorConfig {
            gbxml_length_unit: Some("cubits".into()),
            ..TranslatorConfig::default()
        };
        assert!(matches!(bad.validate(), Err(AppError::Config(_))));

        let future = TranslatorConfig {
            version: CONFIG_VERSION + 1,
            ..TranslatorConfig::default()
        };
        assert!(future.validate().is_err());
    }
}
