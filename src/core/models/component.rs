use std::fmt;

use serde::Deserialize;

/// A component addressed by `name` whose files live in the `type` folder.
///
/// Most components are addressed by their folder name, in which case
/// `name == type_name`. An alias (`node1` of type `node`) reuses the
/// folder of its type but carries its own identity for special keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Component {
    pub name: String,
    pub type_name: String,
}

impl Component {
    /// A component addressed by its folder name.
    pub fn by_type(type_name: &str) -> Self {
        Self {
            name: type_name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    /// An alias of the component stored in the `type_name` folder.
    pub fn by_name_and_type(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    /// Returns true when this component is addressed under another name.
    pub fn is_alias(&self) -> bool {
        self.name != self.type_name
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_alias() {
            write!(f, "{}:{}", self.name, self.type_name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// How a component is listed inside an environment descriptor.
///
/// Either a bare name (`api`) or a mapping naming the alias and the
/// folder it uses (`{ name: node1, type: node }`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComponentEntry {
    Plain(String),
    Aliased {
        name: String,
        #[serde(rename = "type")]
        type_name: String,
    },
}

impl From<ComponentEntry> for Component {
    fn from(entry: ComponentEntry) -> Self {
        match entry {
            ComponentEntry::Plain(name) => Component::by_type(&name),
            ComponentEntry::Aliased { name, type_name } => {
                Component::by_name_and_type(&name, &type_name)
            }
        }
    }
}
