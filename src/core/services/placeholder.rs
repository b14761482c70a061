use std::sync::LazyLock;

use regex::Regex;

/// `key`, `comp@key` or `comp[env]@key`.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<component>[\w.\-]+)(?:\[(?P<env>[\w.\-]+)\])?@)?(?P<key>[\w.\-]+)$")
        .expect("valid placeholder reference regex")
});

/// A parsed `${[component[[env]]@]key[:default]}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The full text, `${` and `}` included.
    pub raw: String,
    pub component: Option<String>,
    pub env: Option<String>,
    pub key: String,
    /// Unresolved default text; may contain placeholders itself.
    pub default: Option<String>,
}

/// A piece of a property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'s> {
    Literal(&'s str),
    Placeholder(Placeholder),
}

/// Split a value into literal text and placeholders, left to right.
///
/// Braces are matched by depth, so defaults may nest placeholders
/// (`${a:${b}}`) or expressions. Text that looks like a placeholder but
/// is unterminated or malformed stays literal.
pub fn segments(value: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = value[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = closing_brace(value, start + 2) else {
            cursor = start + 2;
            continue;
        };

        match parse_placeholder(&value[start..=end]) {
            Some(placeholder) => {
                if literal_start < start {
                    out.push(Segment::Literal(&value[literal_start..start]));
                }
                out.push(Segment::Placeholder(placeholder));
                literal_start = end + 1;
                cursor = end + 1;
            }
            None => cursor = start + 2,
        }
    }

    if literal_start < value.len() {
        out.push(Segment::Literal(&value[literal_start..]));
    }
    out
}

/// Byte index of the `}` closing a brace opened just before `from`.
fn closing_brace(value: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in value[from..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse `${...}` including its delimiters.
fn parse_placeholder(raw: &str) -> Option<Placeholder> {
    let inner = &raw[2..raw.len() - 1];

    let (reference, default) = match split_default(inner) {
        Some(sep) => (&inner[..sep], Some(inner[sep + 1..].to_string())),
        None => (inner, None),
    };

    let caps = REFERENCE.captures(reference.trim())?;
    Some(Placeholder {
        raw: raw.to_string(),
        component: caps.name("component").map(|m| m.as_str().to_string()),
        env: caps.name("env").map(|m| m.as_str().to_string()),
        key: caps["key"].to_string(),
        default,
    })
}

/// Index of the first `:` outside nested braces.
fn split_default(inner: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}
