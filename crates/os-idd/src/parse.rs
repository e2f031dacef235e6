use crate::error::{IddError, IddResult};
use crate::field::{FieldKind, IddField, NumericBound};
use crate::file::IddFile;
use crate::object::IddObject;

pub(crate) fn parse_idd(text: &str) -> IddResult<IddFile> {
    let mut version = String::new();
    let mut header = Vec::new();
    let mut objects: Vec<IddObject> = Vec::new();
    let mut group = String::new();
    let mut current: Option<IddObject> = None;
    let mut seen_object = false;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = raw.trim();

        if let Some(rest) = trimmed.strip_prefix("!IDD_Version") {
            version = rest.trim().to_string();
            continue;
        }
        if trimmed.starts_with('!') && !seen_object {
            header.push(trimmed.to_string());
            continue;
        }
        let line = match trimmed.find('!') {
            Some(pos) => trimmed[..pos].trim(),
            None => trimmed,
        };
        if line.is_empty() {
            continue;
        }

        if line.starts_with('\\') {
            let (key, value) = split_property(line);
            if key.eq_ignore_ascii_case("group") {
                group = value.to_string();
                continue;
            }
            let Some(obj) = current.as_mut() else {
                return Err(parse_err(line_no, format!("property '\\{key}' outside an object")));
            };
            apply_property(obj, key, value).map_err(|m| parse_err(line_no, m))?;
            continue;
        }

        let Some(split) = line.find([',', ';']) else {
            return Err(parse_err(line_no, format!("expected ',' or ';' in '{line}'")));
        };
        let token = line[..split].trim();
        let rest = line[split + 1..].trim();

        match field_kind(token) {
            Some(kind) => {
                let Some(obj) = current.as_mut() else {
                    return Err(parse_err(line_no, format!("field '{token}' outside an object")));
                };
                obj.fields.push(IddField::new(String::new(), kind));
            }
            None => {
                if let Some(done) = current.take() {
                    objects.push(finish(done)?);
                }
                seen_object = true;
                current = Some(IddObject::new(token, group.clone()));
            }
        }

        if rest.starts_with('\\') {
            let (key, value) = split_property(rest);
            if let Some(obj) = current.as_mut() {
                apply_property(obj, key, value).map_err(|m| parse_err(line_no, m))?;
            }
        }
    }
    if let Some(done) = current.take() {
        objects.push(finish(done)?);
    }

    IddFile::from_parts(version, header, objects)
}

fn parse_err(line: usize, message: String) -> IddError {
    IddError::Parse { line, message }
}

fn field_kind(token: &str) -> Option<FieldKind> {
    let mut chars = token.chars();
    let kind = match chars.next()? {
        'A' | 'a' => FieldKind::Alpha,
        'N' | 'n' => FieldKind::Numeric,
        _ => return None,
    };
    let digits = chars.as_str();
    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())).then_some(kind)
}

/// `\minimum> 0` -> ("minimum>", "0"), `\extensible:3 ...` -> ("extensible:3", "...").
fn split_property(line: &str) -> (&str, &str) {
    let body = line.trim_start_matches('\\');
    match body.find(char::is_whitespace) {
        Some(pos) => (&body[..pos], body[pos..].trim()),
        None => (body, ""),
    }
}

fn parse_number(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid numeric bound '{value}'"))
}

fn apply_property(obj: &mut IddObject, key: &str, value: &str) -> Result<(), String> {
    let key_lower = key.to_ascii_lowercase();

    if obj.fields.is_empty() {
        match key_lower.as_str() {
            "memo" => {
                if !obj.memo.is_empty() {
                    obj.memo.push('\n');
                }
                obj.memo.push_str(value);
            }
            "unique-object" => obj.unique = true,
            "required-object" => obj.required = true,
            "format" => obj.format = Some(value.to_string()),
            "min-fields" => {
                obj.min_fields = value
                    .parse()
                    .map_err(|_| format!("invalid \\min-fields '{value}'"))?
            }
            k if k.starts_with("extensible:") => {
                let n = k["extensible:".len()..]
                    .parse::<usize>()
                    .map_err(|_| format!("invalid extensible count in '{key}'"))?;
                if n == 0 {
                    return Err("extensible group size must be positive".to_string());
                }
                obj.extensible = Some(n);
            }
            _ => {}
        }
        return Ok(());
    }

    let Some(field) = obj.fields.last_mut() else {
        return Ok(());
    };
    match key_lower.as_str() {
        "field" => field.name = value.to_string(),
        "type" => {
            field.field_type = value.parse()?;
            field.typed = true;
        }
        "required-field" => field.required = true,
        "default" => field.default = Some(value.to_string()),
        "units" => field.units = Some(value.to_string()),
        "key" => field.keys.push(value.to_string()),
        "reference" => field.references.push(value.to_string()),
        "object-list" => field.object_lists.push(value.to_string()),
        "autosizable" => field.autosizable = true,
        "autocalculatable" => field.autocalculatable = true,
        "begin-extensible" => field.begin_extensible = true,
        "note" => match field.note.as_mut() {
            Some(note) => {
                note.push('\n');
                note.push_str(value);
            }
            None => field.note = Some(value.to_string()),
        },
        k if k.starts_with("minimum") => {
            let (exclusive, number) = bound_parts(&k["minimum".len()..], value, '>');
            field.minimum = Some(NumericBound {
                value: parse_number(number)?,
                exclusive,
            });
        }
        k if k.starts_with("maximum") => {
            let (exclusive, number) = bound_parts(&k["maximum".len()..], value, '<');
            field.maximum = Some(NumericBound {
                value: parse_number(number)?,
                exclusive,
            });
        }
        _ => {}
    }
    Ok(())
}

/// Handles both `\minimum> 0` and `\minimum>0`.
fn bound_parts<'a>(suffix: &'a str, value: &'a str, marker: char) -> (bool, &'a str) {
    match suffix.strip_prefix(marker) {
        Some(inline) if !inline.is_empty() => (true, inline),
        Some(_) => (true, value),
        None => (false, value),
    }
}

fn finish(mut obj: IddObject) -> IddResult<IddObject> {
    if let Some(n) = obj.extensible {
        if n > obj.fields.len() {
            return Err(IddError::BadExtensible {
                object: obj.name,
                extensible: n,
                fields: obj.fields.len(),
            });
        }
        obj.first_extensible = obj
            .fields
            .iter()
            .position(|f| f.begin_extensible)
            .unwrap_or(obj.fields.len() - n);
    }
    for (i, field) in obj.fields.iter_mut().enumerate() {
        if field.name.is_empty() {
            field.name = format!("Field {}", i + 1);
        }
        if !field.typed && !field.keys.is_empty() {
            field.field_type = crate::field::FieldType::Choice;
        }
        if !field.typed && !field.object_lists.is_empty() {
            field.field_type = crate::field::FieldType::ObjectList;
        }
    }
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    const SMALL: &str = r#"!IDD_Version 9.9.9
! a header line
\group Things

Thing,
  \unique-object
  \memo first line
  \memo second line
  A1, \field Name
      \required-field
      \reference ThingNames
  N1, \field Size
      \units m
      \minimum> 0
      \maximum<10
  A2; \field Kind
      \key Big
      \key Small
      \default Small

\group Lists
Bag,
  \extensible:2
  A1, \field Name
  A2, \field Thing Name
      \begin-extensible
      \type object-list
      \object-list ThingNames
  N1; \field Count
      \type integer
"#;

    #[test]
    fn parses_objects_fields_and_properties() {
        let idd = parse_idd(SMALL).unwrap();
        assert_eq!(idd.version(), "9.9.9");
        assert_eq!(idd.header(), ["! a header line"]);

        let thing = idd.get_object("THING").unwrap();
        assert_eq!(thing.group(), "Things");
        assert!(thing.is_unique());
        assert_eq!(thing.memo(), "first line\nsecond line");
        assert_eq!(thing.references(), ["ThingNames"]);

        let size = thing.field(1).unwrap();
        assert_eq!(size.units.as_deref(), Some("m"));
        assert_eq!(
            size.minimum,
            Some(NumericBound {
                value: 0.0,
                exclusive: true
            })
        );
        assert_eq!(size.maximum.unwrap().value, 10.0);
        assert!(size.maximum.unwrap().exclusive);

        let kind = thing.field(2).unwrap();
        assert_eq!(kind.field_type, FieldType::Choice);
        assert_eq!(kind.key("big"), Some("Big"));
    }

    #[test]
    fn extensible_fields_repeat() {
        let idd = parse_idd(SMALL).unwrap();
        let bag = idd.get_object("Bag").unwrap();
        assert_eq!(bag.group(), "Lists");
        assert_eq!(bag.num_fixed_fields(), 1);
        assert_eq!(bag.field(5).unwrap().name, "Thing Name");
        assert_eq!(bag.field(6).unwrap().field_type, FieldType::Integer);
        let ext = bag.extensible_index(6).unwrap();
        assert_eq!((ext.group, ext.field), (2, 1));
        assert_eq!(bag.index_of(ext), Some(6));
        assert!(bag.is_valid_field_count(5));
        assert!(!bag.is_valid_field_count(4));
    }

    #[test]
    fn rejects_fields_outside_objects() {
        let err = parse_idd("A1, \\field Name\n").unwrap_err();
        assert!(matches!(err, IddError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_oversized_extensible_group() {
        let text = "Odd,\n  \\extensible:4\n  A1; \\field Name\n";
        assert!(matches!(
            parse_idd(text),
            Err(IddError::BadExtensible { extensible: 4, .. })
        ));
    }
}
