use std::path::Path;

use serde_yaml::Value as YamlValue;

use super::directives::{self, Directive};
use crate::core::errors::{LayerconfError, Result};
use crate::core::models::fragment::{ParsedFragment, RawEntry};
use crate::core::traits::parser::ComponentParser;

/// Parses YAML config files into flat, dot-separated keys.
///
/// ```yaml
/// server:
///   port: 8080
///   hosts: [a, b]
/// ```
/// yields `server.port=8080` and `server.hosts=a,b`. Comment lines may
/// carry `#include` and `#var` directives, as in properties files.
pub struct YamlParser;

impl YamlParser {
    /// Parse file content. `path` is only used in error messages.
    pub fn parse_content(&self, content: &str, path: &Path, env: &str) -> Result<ParsedFragment> {
        let mut fragment = ParsedFragment::default();

        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if !trimmed.starts_with('#') {
                continue;
            }
            match directives::parse_comment(trimmed, env).map_err(|detail| {
                LayerconfError::ParseError {
                    file: path.to_path_buf(),
                    detail: format!("line {}: {detail}", idx + 1),
                }
            })? {
                Some(Directive::Include(includes)) => fragment.includes.extend(includes),
                Some(Directive::Var(entry)) => fragment.entries.push(entry),
                None => {}
            }
        }

        let document: YamlValue =
            serde_yaml::from_str(content).map_err(|e| LayerconfError::ParseError {
                file: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        match document {
            YamlValue::Null => {}
            YamlValue::Mapping(_) => flatten("", &document, &mut fragment.entries),
            _ => {
                return Err(LayerconfError::ParseError {
                    file: path.to_path_buf(),
                    detail: "top level must be a mapping".into(),
                });
            }
        }

        Ok(fragment)
    }
}

impl ComponentParser for YamlParser {
    fn parse(&self, path: &Path, env: &str) -> Result<ParsedFragment> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LayerconfError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => LayerconfError::Io(e),
        })?;
        self.parse_content(&content, path, env)
    }

    fn supported_extensions(&self) -> &[&str] {
        &[".yaml", ".yml"]
    }
}

fn flatten(prefix: &str, value: &YamlValue, out: &mut Vec<RawEntry>) {
    match value {
        YamlValue::Mapping(map) => {
            for (k, v) in map {
                let key = scalar_to_string(k).unwrap_or_default();
                let full = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&full, v, out);
            }
        }
        YamlValue::Sequence(items) => {
            let scalars: Option<Vec<String>> = items.iter().map(scalar_to_string).collect();
            match scalars {
                Some(list) => push(out, prefix, list.join(",")),
                None => {
                    for (i, item) in items.iter().enumerate() {
                        flatten(&format!("{prefix}[{i}]"), item, out);
                    }
                }
            }
        }
        YamlValue::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        scalar => push(out, prefix, scalar_to_string(scalar).unwrap_or_default()),
    }
}

fn push(out: &mut Vec<RawEntry>, key: &str, value: String) {
    out.push(RawEntry {
        key: key.to_string(),
        value,
        temp: false,
    });
}

fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::Null => Some(String::new()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Tagged(tagged) => scalar_to_string(&tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
    }
}
