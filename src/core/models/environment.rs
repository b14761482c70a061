use std::collections::HashSet;

use super::component::Component;
use crate::core::errors::{LayerconfError, Result};

/// A named set of components that share an IP context.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentGroup {
    pub name: String,
    pub ip: Option<String>,
    pub components: Vec<Component>,
}

impl ComponentGroup {
    /// Returns the component listed under the given name (alias), if any.
    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Declares that an environment extends another one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnvInclude {
    /// Name of the parent environment.
    pub env: String,
    /// Parent groups that are not inherited.
    pub exclude: Vec<String>,
}

/// A deployment environment (dev, uat, prod) and its component layout.
///
/// Environments are immutable once loaded: the include relationship is
/// flattened by `EnvResolver` before an environment reaches the
/// property resolution code.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub name: String,
    pub groups: Vec<ComponentGroup>,
    pub ip: Option<String>,
    pub port_offset: Option<i64>,
    pub include: Option<EnvInclude>,
}

impl Environment {
    /// An environment with no groups and no network settings.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            groups: Vec::new(),
            ip: None,
            port_offset: None,
            include: None,
        }
    }

    /// Find a group by name.
    pub fn group_by_name(&self, group: &str) -> Result<&ComponentGroup> {
        self.groups
            .iter()
            .find(|g| g.name == group)
            .ok_or_else(|| LayerconfError::GroupNotFound {
                group: group.to_string(),
                env: self.name.clone(),
            })
    }

    /// The group that lists a component under the given name, if any.
    pub fn group_by_component_name(&self, name: &str) -> Option<&ComponentGroup> {
        self.groups
            .iter()
            .find(|g| g.component_by_name(name).is_some())
    }

    /// The component listed under the given name, if any.
    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.groups.iter().find_map(|g| g.component_by_name(name))
    }

    /// All components in declaration order.
    pub fn all_components(&self) -> Vec<&Component> {
        self.groups.iter().flat_map(|g| g.components.iter()).collect()
    }

    /// The ip a listed component gets: its group's ip, else the
    /// environment default. Unlisted components have none.
    pub fn ip_of(&self, component_name: &str) -> Option<&str> {
        let group = self.group_by_component_name(component_name)?;
        group.ip.as_deref().or(self.ip.as_deref())
    }

    /// 1-based position of a component across all groups.
    pub fn order_of(&self, component_name: &str) -> Option<usize> {
        self.all_components()
            .iter()
            .position(|c| c.name == component_name)
            .map(|i| i + 1)
    }

    /// Fail if a component name appears more than once.
    pub fn verify_unique_component_names(self) -> Result<Self> {
        let mut unique = HashSet::new();
        for component in self.all_components() {
            if !unique.insert(component.name.as_str()) {
                return Err(LayerconfError::DuplicateComponent {
                    component: component.name.clone(),
                    env: self.name.clone(),
                });
            }
        }
        Ok(self)
    }

    /// Fail if a group has no ip and the environment has no default.
    pub fn verify_ips_present(self) -> Result<Self> {
        if self.ip.is_none()
            && let Some(group) = self.groups.iter().find(|g| g.ip.is_none())
        {
            return Err(LayerconfError::MissingGroupIp {
                group: group.name.clone(),
                env: self.name.clone(),
            });
        }
        Ok(self)
    }
}
