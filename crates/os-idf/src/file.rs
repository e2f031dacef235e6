//! Whole IDF/OSM files.

use std::path::Path;
use std::sync::Arc;

use os_core::VersionString;
use os_idd::{IddFile, IddFileType};
use tracing::warn;

use crate::encoding::decode;
use crate::error::{IdfError, IdfResult};
use crate::object::IdfObject;

#[derive(Debug, Clone)]
pub struct IdfFile {
    idd_type: IddFileType,
    idd: Arc<IddFile>,
    header: Vec<String>,
    objects: Vec<IdfObject>,
}

impl IdfFile {
    pub fn new(idd_type: IddFileType) -> Self {
        Self {
            idd_type,
            idd: idd_type.idd(),
            header: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn idd_type(&self) -> IddFileType {
        self.idd_type
    }

    pub fn idd(&self) -> &Arc<IddFile> {
        &self.idd
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn set_header(&mut self, lines: Vec<String>) {
        self.header = lines;
    }

    pub fn objects(&self) -> &[IdfObject] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<IdfObject> {
        self.objects
    }

    pub fn add_object(&mut self, object: IdfObject) {
        self.objects.push(object);
    }

    pub fn objects_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a IdfObject> {
        self.objects
            .iter()
            .filter(move |o| o.type_name().eq_ignore_ascii_case(type_name))
    }

    /// Version declared by the file's version object, if any.
    pub fn version(&self) -> Option<VersionString> {
        let index = match self.idd_type {
            IddFileType::OpenStudio => 1,
            IddFileType::EnergyPlus => 0,
        };
        self.objects_of_type(self.idd_type.version_type())
            .next()
            .and_then(|o| o.get(index))
            .and_then(|v| v.parse().ok())
    }

    /// Parse IDF syntax. Object types missing from the schema are kept and warned about.
    pub fn parse(text: &str, idd_type: IddFileType) -> IdfResult<Self> {
        let mut file = Self::new(idd_type);
        let mut pending_comment: Vec<String> = Vec::new();
        let mut tokens: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut start_line = 0;
        let mut seen_object = false;

        for (i, raw) in text.lines().enumerate() {
            let (code, comment) = match raw.find('!') {
                Some(pos) => (&raw[..pos], Some(&raw[pos..])),
                None => (raw, None),
            };

            if tokens.is_empty() && current.trim().is_empty() {
                match comment {
                    Some(comment) if !comment.starts_with("!-") => {
                        let body = comment.trim_start_matches('!');
                        let body = body.strip_prefix(' ').unwrap_or(body).trim_end();
                        pending_comment.push(body.to_string());
                    }
                    // A blank line closes the file header.
                    None if code.trim().is_empty() && !seen_object => {
                        file.header.append(&mut pending_comment);
                    }
                    _ => {}
                }
            }

            for c in code.chars() {
                match c {
                    ',' | ';' => {
                        if tokens.is_empty() && current.trim().is_empty() {
                            return Err(IdfError::Parse {
                                line: i + 1,
                                message: "missing object type".to_string(),
                            });
                        }
                        if tokens.is_empty() {
                            start_line = i + 1;
                        }
                        tokens.push(decode(current.trim()));
                        current.clear();
                        if c == ';' {
                            let mut fields = std::mem::take(&mut tokens).into_iter();
                            let type_name = fields.next().unwrap_or_default();
                            let mut object = IdfObject::with_fields(type_name, fields);
                            object.set_comment(std::mem::take(&mut pending_comment));
                            seen_object = true;
                            file.push_parsed(object);
                        }
                    }
                    _ => current.push(c),
                }
            }
            if !current.trim().is_empty() {
                current.push(' ');
            }
        }

        if !tokens.is_empty() || !current.trim().is_empty() {
            return Err(IdfError::Parse {
                line: start_line.max(1),
                message: "object is not terminated by ';'".to_string(),
            });
        }
        Ok(file)
    }

    fn push_parsed(&mut self, mut object: IdfObject) {
        match self.idd.get_object(object.type_name()) {
            Some(idd_obj) => {
                if idd_obj.name() != object.type_name() {
                    object.set_type_name(idd_obj.name());
                }
            }
            None => warn!(
                object_type = object.type_name(),
                schema = self.idd_type.as_str(),
                "object type is not in the schema"
            ),
        }
        self.objects.push(object);
    }

    pub fn print(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            if line.is_empty() {
                out.push_str("!\n");
            } else {
                out.push_str("! ");
                out.push_str(line);
                out.push('\n');
            }
        }
        for object in &self.objects {
            out.push('\n');
            out.push_str(&object.print(self.idd.get_object(object.type_name())));
        }
        out
    }

    pub fn load(path: &Path, idd_type: IddFileType) -> IdfResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, idd_type)
    }

    pub fn save(&self, path: &Path) -> IdfResult<()> {
        std::fs::write(path, self.print())?;
        Ok(())
    }
}
