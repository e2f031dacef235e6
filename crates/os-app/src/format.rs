//! Which reader or writer a path is routed to.

use std::path::Path;

use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileFormat {
    Osm,
    Idf,
    GbXml,
    Sdd,
}

impl FileFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Osm => "OSM",
            FileFormat::Idf => "IDF",
            FileFormat::GbXml => "gbXML",
            FileFormat::Sdd => "SDD",
        }
    }

    /// Format named by the extension alone; `.xml` counts as gbXML.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "osm" => Some(FileFormat::Osm),
            "idf" => Some(FileFormat::Idf),
            "xml" | "gbxml" => Some(FileFormat::GbXml),
            "sdd" => Some(FileFormat::Sdd),
            _ => None,
        }
    }

    /// Format of an existing file. `.xml` files are told apart by their root element.
    pub fn detect(path: &Path) -> AppResult<Self> {
        let unknown = || AppError::UnknownFormat {
            path: path.to_path_buf(),
        };
        let format = Self::from_extension(path).ok_or_else(unknown)?;
        if format != FileFormat::GbXml {
            return Ok(format);
        }
        let text = std::fs::read_to_string(path)?;
        match root_element(&text) {
            Some(root) if root.eq_ignore_ascii_case("SDDXML") => Ok(FileFormat::Sdd),
            Some(root) if root.eq_ignore_ascii_case("gbXML") => Ok(FileFormat::GbXml),
            _ => Err(unknown()),
        }
    }
}

/// Name of the first element, skipping the declaration, comments and doctype.
pub fn root_element(text: &str) -> Option<&str> {
    let mut rest = text;
    loop {
        let start = rest.find('<')?;
        rest = &rest[start + 1..];
        if let Some(after) = rest.strip_prefix("!--") {
            let end = after.find("-->")?;
            rest = &after[end + 3..];
        } else if rest.starts_with('?') || rest.starts_with('!') {
            let end = rest.find('>')?;
            rest = &rest[end + 1..];
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .unwrap_or(rest.len());
            let name = &rest[..end];
            // Drop a namespace prefix.
            return Some(name.rsplit(':').next().unwrap_or(name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(FileFormat::from_extension(Path::new("a.OSM")), Some(FileFormat::Osm));
        assert_eq!(FileFormat::from_extension(Path::new("in.idf")), Some(FileFormat::Idf));
        assert_eq!(FileFormat::from_extension(Path::new("b.gbxml")), Some(FileFormat::GbXml));
        assert_eq!(FileFormat::from_extension(Path::new("c.sdd")), Some(FileFormat::Sdd));
        assert_eq!(FileFormat::from_extension(Path::new("d.txt")), None);
        assert_eq!(FileFormat::from_extension(Path::new("noext")), None);
    }

    #[test]
    fn root_skips_prolog() {
        let text = "<?xml version=\"1.0\"?>\n<!-- made by hand -->\n<!DOCTYPE x>\n<SDDXML><Proj/></SDDXML>";
        assert_eq!(root_element(text), Some("SDDXML"));
        assert_eq!(
            root_element("<gb:gbXML xmlns:gb=\"http://www.gbxml.org/schema\">"),
            Some("gbXML")
        );
        assert_eq!(root_element("no markup"), None);
    }
}
