use std::path::PathBuf;

/// Broad classification of a [`LayerconfError`].
///
/// Callers that need to react differently to a cycle than to a missing
/// key match on this instead of on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lookup,
    CyclicResolution,
    UnresolvedPlaceholder,
    ExpressionEvaluation,
    ConfigurationInvariant,
    Plumbing,
}

/// All domain errors for layerconf.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum LayerconfError {
    #[error(
        "Component '{component}' not found (environment '{env}')\n\n  \
         No folder with that name exists under the components directory.\n  \
         Check the component name or the include that references it."
    )]
    ComponentNotFound { component: String, env: String },

    #[error(
        "Environment '{name}' not found\n\n  \
         Available environments: {available}\n  \
         Environments are defined as <name>.yaml files in the envs directory."
    )]
    EnvironmentNotFound { name: String, available: String },

    #[error("Group '{group}' not found in environment '{env}'")]
    GroupNotFound { group: String, env: String },

    #[error(
        "Cyclic placeholder resolution detected: {path}\n\n  \
         Two or more properties reference each other.\n\n  \
         Fix: break the loop so every placeholder ends in a literal value:\n    \
         → Valid:   a=${{b}}, b=42\n    \
         → Invalid: a=${{b}}, b=${{a}} (cycle)"
    )]
    CyclicResolution { path: String },

    #[error(
        "Circular environment include detected: {chain}\n\n  \
         Two or more environments include each other, creating a loop.\n\n  \
         Fix: edit the envs directory and ensure includes form a tree:\n    \
         → Valid:   base → dev, base → uat\n    \
         → Invalid: dev → uat → dev (cycle)"
    )]
    CyclicInclude { chain: String },

    #[error(
        "Can't resolve placeholder {placeholder} for component '{component}' \
         in environment '{env}'\n\n  \
         The key is not declared by the component and is not a special key.\n  \
         Declare it, or add a default: ${{key:default}}"
    )]
    UnresolvedPlaceholder {
        placeholder: String,
        component: String,
        env: String,
    },

    #[error("Can't evaluate expression #{{{expression}}} in component '{component}': {reason}")]
    ExpressionEvaluation {
        expression: String,
        component: String,
        reason: String,
    },

    #[error("Environment '{env}' contains several definitions of component '{component}'")]
    DuplicateComponent { component: String, env: String },

    #[error(
        "Environment '{env}' doesn't have an ip for group '{group}'\n\n  \
         Set 'ip' on the group or a default 'ip' on the environment."
    )]
    MissingGroupIp { group: String, env: String },

    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists.\n  \
         Run 'layerconf envs' to see available environments."
    )]
    FileNotFound { path: PathBuf },

    #[error("Parse error in {file}: {detail}")]
    ParseError { file: PathBuf, detail: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LayerconfError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ComponentNotFound { .. }
            | Self::EnvironmentNotFound { .. }
            | Self::GroupNotFound { .. } => ErrorKind::Lookup,
            Self::CyclicResolution { .. } | Self::CyclicInclude { .. } => {
                ErrorKind::CyclicResolution
            }
            Self::UnresolvedPlaceholder { .. } => ErrorKind::UnresolvedPlaceholder,
            Self::ExpressionEvaluation { .. } => ErrorKind::ExpressionEvaluation,
            Self::DuplicateComponent { .. } | Self::MissingGroupIp { .. } => {
                ErrorKind::ConfigurationInvariant
            }
            Self::FileNotFound { .. }
            | Self::ParseError { .. }
            | Self::InvalidConfig { .. }
            | Self::Io(_) => ErrorKind::Plumbing,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LayerconfError>;
