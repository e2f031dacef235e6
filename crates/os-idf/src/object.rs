//! Text-level objects, one per `Type, field, ...;` statement.

use std::fmt::Write as _;

use os_idd::IddObject;

use crate::encoding::encode;

/// Column where `!-` field comments start.
pub const FIELD_COMMENT_COLUMN: usize = 38;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdfObject {
    type_name: String,
    fields: Vec<String>,
    /// Comment lines printed before the object, without the leading `!`.
    comment: Vec<String>,
}

impl IdfObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_fields<I, S>(type_name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            comment: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn set_type_name(&mut self, name: impl Into<String>) {
        self.type_name = name.into();
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Sets a field, growing the object with empty fields as needed.
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if index >= self.fields.len() {
            self.fields.resize(index + 1, String::new());
        }
        self.fields[index] = value.into();
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.fields.push(value.into());
    }

    pub fn comment(&self) -> &[String] {
        &self.comment
    }

    pub fn set_comment(&mut self, lines: Vec<String>) {
        self.comment = lines;
    }

    /// Name field value, located through the schema when one is given.
    pub fn name(&self, idd: Option<&IddObject>) -> Option<&str> {
        let index = match idd {
            Some(obj) => obj.name_field_index()?,
            None => 0,
        };
        self.get(index).filter(|s| !s.is_empty())
    }

    /// Print in IDF syntax. With a schema, fields get `!-` comments.
    pub fn print(&self, idd: Option<&IddObject>) -> String {
        let mut out = String::new();
        for line in &self.comment {
            if line.is_empty() {
                out.push_str("!\n");
            } else {
                let _ = writeln!(out, "! {line}");
            }
        }

        if self.fields.is_empty() {
            let _ = writeln!(out, "{};", self.type_name);
            return out;
        }

        if idd.is_some_and(|o| o.format().is_some_and(|f| f.eq_ignore_ascii_case("singleLine"))) {
            let values: Vec<String> = self.fields.iter().map(|f| encode(f)).collect();
            let _ = writeln!(out, "{},{};", self.type_name, values.join(","));
            return out;
        }

        let _ = writeln!(out, "{},", self.type_name);
        let last = self.fields.len() - 1;
        let vertex_start = idd
            .filter(|o| o.has_vertex_format())
            .map(|o| o.num_fixed_fields());

        let mut i = 0;
        while i <= last {
            if let Some(start) = vertex_start
                && i >= start
                && i + 2 <= last
            {
                let end = if i + 2 == last { ';' } else { ',' };
                let text = format!(
                    "  {}, {}, {}{}",
                    encode(&self.fields[i]),
                    encode(&self.fields[i + 1]),
                    encode(&self.fields[i + 2]),
                    end
                );
                let vertex = (i - start) / 3 + 1;
                let _ = writeln!(out, "{}!- X,Y,Z Vertex {} {{m}}", pad(text), vertex);
                i += 3;
                continue;
            }

            let end = if i == last { ';' } else { ',' };
            let text = format!("  {}{}", encode(&self.fields[i]), end);
            match idd.map(|o| field_comment(o, i)) {
                Some(comment) => {
                    let _ = writeln!(out, "{}!- {}", pad(text), comment);
                }
                None => {
                    let _ = writeln!(out, "{text}");
                }
            }
            i += 1;
        }
        out
    }
}

fn pad(mut text: String) -> String {
    if text.len() < FIELD_COMMENT_COLUMN {
        let width = FIELD_COMMENT_COLUMN - text.len();
        text.extend(std::iter::repeat_n(' ', width));
    } else {
        text.push_str("  ");
    }
    text
}

fn field_comment(idd: &IddObject, index: usize) -> String {
    let Some(field) = idd.field(index) else {
        return String::new();
    };
    let mut comment = field.name.clone();
    if let Some(ext) = idd.extensible_index(index) {
        let _ = write!(comment, " {}", ext.group + 1);
    }
    if let Some(units) = &field.units {
        let _ = write!(comment, " {{{units}}}");
    }
    comment
}

#[cfg(test)]
mod tests {
    use super::*;
    use os_idd::IddFileType;

    #[test]
    fn prints_field_comments_at_fixed_column() {
        let idd = IddFileType::EnergyPlus.idd();
        let zone_idd = idd.get_object("Zone").unwrap();
        let zone = IdfObject::with_fields("Zone", ["Core Zone", "0", "1.5"]);
        let text = zone.print(Some(zone_idd));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Zone,");
        assert_eq!(lines[1].find("!-"), Some(FIELD_COMMENT_COLUMN));
        assert!(lines[1].starts_with("  Core Zone,"));
        assert!(lines[2].ends_with("!- Direction of Relative North {deg}"));
        assert!(lines[3].starts_with("  1.5;"));
    }

    #[test]
    fn prints_vertices_one_per_line() {
        let idd = IddFileType::OpenStudio.idd();
        let surface_idd = idd.get_object("OS:Surface").unwrap();
        let mut surface = IdfObject::new("OS:Surface");
        surface.set(9, "");
        for v in ["0", "0", "3", "0", "0", "0", "4", "0", "0"] {
            surface.push(v);
        }
        let text = surface.print(Some(surface_idd));
        assert!(text.contains("  0, 0, 3,"));
        assert!(text.contains("!- X,Y,Z Vertex 3 {m}"));
        assert!(text.trim_end().lines().last().unwrap().starts_with("  4, 0, 0;"));
    }

    #[test]
    fn single_line_format() {
        let idd = IddFileType::EnergyPlus.idd();
        let version = IdfObject::with_fields("Version", ["9.4"]);
        assert_eq!(version.print(idd.get_object("Version")), "Version,9.4;\n");
    }

    #[test]
    fn encodes_special_characters_when_printing() {
        let mut obj = IdfObject::with_fields("Thing", ["a,b"]);
        obj.set_comment(vec!["note".into()]);
        assert_eq!(obj.print(None), "! note\nThing,\n  a&#44b;\n");
    }
}
