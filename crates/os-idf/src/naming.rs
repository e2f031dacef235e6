//! Unique object names: `Base`, `Base 1`, `Base_2`, ...

/// `"Space 12"` -> `("Space", ' ', 12)`. Suffixes must be positive integers.
pub fn split_suffix(name: &str) -> Option<(&str, char, u32)> {
    let pos = name.rfind([' ', '_'])?;
    let digits = &name[pos + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u32 = digits.parse().ok()?;
    if n == 0 {
        return None;
    }
    let spacer = name[pos..].chars().next()?;
    Some((&name[..pos], spacer, n))
}

/// Name without a trailing numeric suffix.
pub fn base_name(name: &str) -> &str {
    split_suffix(name).map_or(name, |(base, _, _)| base)
}

/// Next free `base N` among `existing`, compared case-insensitively.
///
/// With `fill_in` the smallest unused suffix is taken, otherwise one more than
/// the largest. The spacer of existing suffixed names is kept.
pub fn next_name<'a, I>(base: &str, existing: I, fill_in: bool) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let base = base.trim();
    let mut spacer = ' ';
    let mut taken: Vec<u32> = Vec::new();
    for name in existing {
        if let Some((b, sp, n)) = split_suffix(name)
            && b.eq_ignore_ascii_case(base)
        {
            spacer = sp;
            taken.push(n);
        }
    }
    taken.sort_unstable();
    taken.dedup();

    let n = if fill_in {
        let mut candidate = 1;
        for &t in &taken {
            if t == candidate {
                candidate += 1;
            } else if t > candidate {
                break;
            }
        }
        candidate
    } else {
        taken.last().map_or(1, |max| max + 1)
    };
    format!("{base}{spacer}{n}")
}

/// Default base name for new objects of a schema type:
/// `OS:ThermalZone` -> `Thermal Zone`, `OS:Schedule:Day` -> `Schedule Day`.
pub fn default_base_name(type_name: &str) -> String {
    let stripped = type_name.strip_prefix("OS:").unwrap_or(type_name);
    let mut out = String::with_capacity(stripped.len() + 4);
    let mut prev: Option<char> = None;
    for c in stripped.chars() {
        if c == ':' {
            if !out.ends_with(' ') {
                out.push(' ');
            }
            prev = Some(' ');
            continue;
        }
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn suffix_parsing() {
        assert_eq!(split_suffix("Space 12"), Some(("Space", ' ', 12)));
        assert_eq!(split_suffix("Zone_3"), Some(("Zone", '_', 3)));
        assert_eq!(split_suffix("Zone 0"), None);
        assert_eq!(split_suffix("Zone A"), None);
        assert_eq!(split_suffix("Zone"), None);
        assert_eq!(base_name("Thermal Zone 7"), "Thermal Zone");
    }

    #[test]
    fn next_name_appends_or_fills() {
        let names = ["Space 1", "Space 2", "Space 5", "Other 9"];
        assert_eq!(next_name("Space", names, false), "Space 6");
        assert_eq!(next_name("Space", names, true), "Space 3");
        assert_eq!(next_name("Zone", names, true), "Zone 1");
        assert_eq!(next_name("zone", ["Zone_1"], false), "zone_2");
    }

    #[test]
    fn base_names_from_types() {
        assert_eq!(default_base_name("OS:ThermalZone"), "Thermal Zone");
        assert_eq!(default_base_name("OS:Schedule:Day"), "Schedule Day");
        assert_eq!(
            default_base_name("OS:WindowMaterial:SimpleGlazingSystem"),
            "Window Material Simple Glazing System"
        );
        assert_eq!(default_base_name("OS:ScheduleTypeLimits"), "Schedule Type Limits");
    }

    proptest! {
        #[test]
        fn next_name_is_never_taken(suffixes in proptest::collection::vec(1u32..50, 0..20), fill in any::<bool>()) {
            let names: Vec<String> = suffixes.iter().map(|n| format!("Surface {n}")).collect();
            let next = next_name("Surface", names.iter().map(String::as_str), fill);
            prop_assert!(!names.contains(&next));
        }
    }
}
