use super::config_type::ConfigType;
use super::property::Layer;

/// Selects the files of one layer for one environment and config type.
///
/// A file stem is split on dots: the first part is the base name, the
/// rest are environment qualifiers.
/// - `service.yaml` belongs to [`Layer::Defaults`]
/// - `service.dev.uat.yaml` belongs to [`Layer::EnvShared`] for `dev` and `uat`
/// - `service.dev.yaml` belongs to [`Layer::EnvSpecific`] for `dev` only
#[derive(Debug, Clone)]
pub struct LayerFilter {
    pub layer: Layer,
    pub env: String,
    pub extensions: Vec<String>,
}

impl LayerFilter {
    pub fn new(layer: Layer, env: &str, config_type: &ConfigType) -> Self {
        Self {
            layer,
            env: env.to_string(),
            extensions: config_type.extensions.clone(),
        }
    }

    /// Returns true if the file name belongs to this layer.
    pub fn accepts(&self, file_name: &str) -> bool {
        let Some(stem) = self
            .extensions
            .iter()
            .find_map(|ext| file_name.strip_suffix(ext.as_str()))
        else {
            return false;
        };

        let mut parts = stem.split('.');
        if parts.next().is_none_or(str::is_empty) {
            return false;
        }
        let qualifiers: Vec<&str> = parts.collect();

        match self.layer {
            Layer::Defaults => qualifiers.is_empty(),
            Layer::EnvShared => {
                qualifiers.len() > 1 && qualifiers.iter().any(|q| *q == self.env)
            }
            Layer::EnvSpecific => qualifiers.len() == 1 && qualifiers[0] == self.env,
        }
    }
}
