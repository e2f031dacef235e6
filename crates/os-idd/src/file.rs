//! Parsed IDD files and the embedded schemas.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::error::{IddError, IddResult};
use crate::object::IddObject;
use crate::parse::parse_idd;

#[derive(Debug, Clone)]
pub struct IddFile {
    version: String,
    header: Vec<String>,
    objects: Vec<IddObject>,
    index: HashMap<String, usize>,
}

impl IddFile {
    pub fn parse(text: &str) -> IddResult<Self> {
        parse_idd(text)
    }

    pub(crate) fn from_parts(
        version: String,
        header: Vec<String>,
        objects: Vec<IddObject>,
    ) -> IddResult<Self> {
        let mut index = HashMap::with_capacity(objects.len());
        for (i, obj) in objects.iter().enumerate() {
            if index.insert(obj.name().to_ascii_lowercase(), i).is_some() {
                return Err(IddError::DuplicateObject(obj.name().to_string()));
            }
        }
        Ok(Self {
            version,
            header,
            objects,
            index,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn objects(&self) -> &[IddObject] {
        &self.objects
    }

    /// Case-insensitive lookup.
    pub fn get_object(&self, name: &str) -> Option<&IddObject> {
        self.index
            .get(&name.to_ascii_lowercase())
            .and_then(|&i| self.objects.get(i))
    }

    pub fn required_objects(&self) -> impl Iterator<Item = &IddObject> {
        self.objects.iter().filter(|o| o.is_required())
    }

    pub fn unique_objects(&self) -> impl Iterator<Item = &IddObject> {
        self.objects.iter().filter(|o| o.is_unique())
    }

    /// `OS:Version` or `Version`, whichever the file defines.
    pub fn version_object(&self) -> Option<&IddObject> {
        self.get_object("OS:Version")
            .or_else(|| self.get_object("Version"))
    }

    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for obj in &self.objects {
            if !groups.contains(&obj.group()) {
                groups.push(obj.group());
            }
        }
        groups
    }
}

/// Which embedded schema a workspace is typed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IddFileType {
    OpenStudio,
    EnergyPlus,
}

static OPENSTUDIO_IDD: &str = include_str!("../resources/openstudio.idd");
static ENERGYPLUS_IDD: &str = include_str!("../resources/energyplus.idd");

impl IddFileType {
    /// The shared, parsed schema.
    ///
    /// # Panics
    /// If the embedded text does not parse.
    pub fn idd(self) -> Arc<IddFile> {
        static OS: OnceLock<Arc<IddFile>> = OnceLock::new();
        static EP: OnceLock<Arc<IddFile>> = OnceLock::new();
        let (cell, text) = match self {
            IddFileType::OpenStudio => (&OS, OPENSTUDIO_IDD),
            IddFileType::EnergyPlus => (&EP, ENERGYPLUS_IDD),
        };
        cell.get_or_init(|| Arc::new(parse_idd(text).expect("embedded IDD is well formed")))
            .clone()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IddFileType::OpenStudio => "OpenStudio",
            IddFileType::EnergyPlus => "EnergyPlus",
        }
    }

    /// Version object type name in this schema.
    pub fn version_type(self) -> &'static str {
        match self {
            IddFileType::OpenStudio => "OS:Version",
            IddFileType::EnergyPlus => "Version",
        }
    }
}
