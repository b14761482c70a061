use std::fmt;

/// A reference from one component's files to another component,
/// whose properties are merged in underneath the includer's own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Include {
    /// Folder name of the included component.
    pub component: String,
    /// Environment the included component is read in.
    pub env: String,
}

impl Include {
    pub fn new(component: &str, env: &str) -> Self {
        Self {
            component: component.to_string(),
            env: env.to_string(),
        }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.component, self.env)
    }
}

/// A single key/value pair as written in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub key: String,
    pub value: String,
    /// Declared with `#var`: an input for other values only.
    pub temp: bool,
}

/// The raw content of one parsed config file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFragment {
    /// Entries in file order.
    pub entries: Vec<RawEntry>,
    /// Includes in declaration order.
    pub includes: Vec<Include>,
}
