/// A named family of config files, selected by extension.
///
/// Resolution always happens for one config type: the `application`
/// properties of a component are resolved independently from its
/// `process` properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigType {
    pub name: String,
    /// Extensions with the leading dot (e.g. `".yaml"`).
    pub extensions: Vec<String>,
}

impl ConfigType {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| normalize_extension(e)).collect(),
        }
    }

    /// A type whose single extension is its own name (`env` → `.env`).
    pub fn extension_as_name(name: &str) -> Self {
        Self::new(name, &[&format!(".{name}")])
    }

    /// The types every project has, in output order.
    pub fn standard() -> Vec<ConfigType> {
        vec![
            Self::new("application", &[".properties", ".yaml", ".yml"]),
            Self::new("process", &[".process", ".proc"]),
            Self::new("deploy", &[".deploy"]),
            Self::extension_as_name("env"),
            Self::extension_as_name("secret"),
            Self::extension_as_name("log4j"),
            Self::extension_as_name("log4j2"),
        ]
    }
}

/// Ensure an extension starts with a dot.
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
