use std::sync::LazyLock;

use regex::Regex;

use crate::core::models::fragment::{Include, RawEntry};

/// `#include a, b[env]`, `#@include a` and `#@Include:a` all declare includes.
static INCLUDE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*(?P<marker>@)?(?i:include)(?:\s*:\s*|\s+)(?P<targets>.+)$")
        .expect("valid include regex")
});

/// `#var key=value` declares a temp property.
static VAR_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*@?var\s+(?P<key>[^=:\s]+)\s*[=:]\s*(?P<value>.*)$")
        .expect("valid var regex")
});

/// `name` or `name[env]`.
static INCLUDE_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<component>[\w.\-]+)(?:\[(?P<env>[\w.\-]+)\])?$")
        .expect("valid include target regex")
});

/// A comment line that carries meaning.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Include(Vec<Include>),
    Var(RawEntry),
}

/// Parse a comment line into a directive, if it is one.
///
/// Targets without an explicit environment are read in `env`. A plain
/// `# include ...` line whose targets don't parse is prose and stays a
/// comment; with the `@` marker, invalid targets are reported as `Err`.
pub fn parse_comment(line: &str, env: &str) -> Result<Option<Directive>, String> {
    let trimmed = line.trim();

    if let Some(caps) = INCLUDE_DIRECTIVE.captures(trimmed) {
        let parsed = caps["targets"]
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|target| parse_target(target, env))
            .collect::<Result<Vec<_>, _>>();
        return match parsed {
            Ok(includes) => Ok(Some(Directive::Include(includes))),
            Err(_) if caps.name("marker").is_none() => Ok(None),
            Err(e) => Err(e),
        };
    }

    if let Some(caps) = VAR_DIRECTIVE.captures(trimmed) {
        return Ok(Some(Directive::Var(RawEntry {
            key: caps["key"].to_string(),
            value: caps["value"].trim().to_string(),
            temp: true,
        })));
    }

    Ok(None)
}

fn parse_target(target: &str, env: &str) -> Result<Include, String> {
    let caps = INCLUDE_TARGET
        .captures(target)
        .ok_or_else(|| format!("invalid include target '{target}', expected name or name[env]"))?;
    let component = &caps["component"];
    let env = caps.name("env").map_or(env, |m| m.as_str());
    Ok(Include::new(component, env))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn includes(line: &str) -> Vec<Include> {
        match parse_comment(line, "dev").unwrap() {
            Some(Directive::Include(list)) => list,
            other => panic!("expected include, got {other:?}"),
        }
    }

    #[test]
    fn include_styles_are_equivalent() {
        let expected = vec![Include::new("a", "dev"), Include::new("b", "uat")];
        assert_eq!(includes("#include a, b[uat]"), expected);
        assert_eq!(includes("#@include a,b[uat]"), expected);
        assert_eq!(includes("#@Include: a, b[uat]"), expected);
        assert_eq!(includes("  # include a , b[uat]"), expected);
        assert_eq!(includes("#@Include:a,b[uat]"), expected);
        assert_eq!(includes("#include:a, b[uat]"), expected);
    }

    #[test]
    fn var_declares_temp_entry() {
        let directive = parse_comment("#var port = 8080", "dev").unwrap();
        assert_eq!(
            directive,
            Some(Directive::Var(RawEntry {
                key: "port".to_string(),
                value: "8080".to_string(),
                temp: true,
            }))
        );
    }

    #[test]
    fn plain_comments_are_not_directives() {
        assert_eq!(parse_comment("# just a note", "dev").unwrap(), None);
        assert_eq!(parse_comment("#includes are great", "dev").unwrap(), None);
        assert_eq!(
            parse_comment("# include the shared db settings below", "dev").unwrap(),
            None
        );
    }

    #[test]
    fn invalid_marked_target_is_reported() {
        let err = parse_comment("#@include bad target!", "dev").unwrap_err();
        assert!(err.contains("bad target!"));
    }
}
