//! Escaping of characters that carry meaning in IDF syntax.

const TABLE: [(char, &str); 5] = [
    ('\n', "&#10"),
    ('\r', "&#13"),
    (',', "&#44"),
    (';', "&#59"),
    ('!', "&#33"),
];

pub fn encode(value: &str) -> String {
    if !value.contains(['\n', '\r', ',', ';', '!']) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match TABLE.iter().find(|(raw, _)| *raw == c) {
            Some((_, code)) => out.push_str(code),
            None => out.push(c),
        }
    }
    out
}

pub fn decode(value: &str) -> String {
    if !value.contains("&#") {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    'outer: while !rest.is_empty() {
        if rest.starts_with("&#") {
            for (raw, code) in TABLE {
                if let Some(tail) = rest.strip_prefix(code) {
                    out.push(raw);
                    rest = tail;
                    continue 'outer;
                }
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_separators() {
        assert_eq!(encode("a,b;c!"), "a&#44b&#59c&#33");
        assert_eq!(encode("line\nnext\r"), "line&#10next&#13");
        assert_eq!(decode("a&#44b&#59c&#33"), "a,b;c!");
        assert_eq!(decode("&#1x"), "&#1x");
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(s in "[a-zA-Z0-9 ,;!\r\n#:._-]{0,40}") {
            let encoded = encode(&s);
            prop_assert!(!encoded.contains([',', ';', '!', '\n', '\r']));
            prop_assert_eq!(decode(&encoded), s);
        }
    }
}
