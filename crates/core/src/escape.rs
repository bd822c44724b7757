const ENTITIES: [(&str, char); 5] = [
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&amp;", '&'),
    ("\\\"", '"'),
    ("&#39;", '\''),
];

/// Reverse the fixed set of escapes applied to record names upstream.
///
/// Single pass: the output of one substitution is never re-scanned, so
/// `&amp;lt;` becomes `&lt;`, not `<`. Anything outside the table is left
/// untouched; this is not general HTML decoding.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    'scan: while let Some(c) = rest.chars().next() {
        if c == '&' || c == '\\' {
            for (entity, ch) in ENTITIES {
                if let Some(tail) = rest.strip_prefix(entity) {
                    out.push(ch);
                    rest = tail;
                    continue 'scan;
                }
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}
