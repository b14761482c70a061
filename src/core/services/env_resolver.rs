use std::collections::{HashMap, HashSet};

use crate::core::errors::{LayerconfError, Result};
use crate::core::models::environment::{ComponentGroup, Environment};

/// Resolves environment includes (base -> dev/uat/prod).
///
/// Given the environments as declared, walks the `include` chain of the
/// requested one and merges them from root to leaf. The including
/// environment always takes precedence over the included one.
pub struct EnvResolver;

impl EnvResolver {
    /// Resolve the full include chain for the given environment and
    /// verify the invariants of the result.
    ///
    /// # Errors
    ///
    /// - `EnvironmentNotFound` if the environment or any parent is not
    ///   declared.
    /// - `CyclicInclude` if the chain contains a cycle.
    /// - `DuplicateComponent` / `MissingGroupIp` if the merged
    ///   environment breaks an invariant.
    pub fn resolve(
        &self,
        name: &str,
        declared: &HashMap<String, Environment>,
    ) -> Result<Environment> {
        let chain = self.build_chain(name, declared)?;

        let mut layers = chain.iter().map(|n| &declared[n.as_str()]);
        let Some(root) = layers.next() else {
            return Err(not_found(name, declared));
        };

        let mut merged = root.clone();
        for child in layers {
            merged = Self::merge(&merged, child);
        }

        tracing::debug!(env = name, chain = %chain.join(" -> "), "Resolved environment includes");

        merged
            .verify_unique_component_names()?
            .verify_ips_present()
    }

    /// Build the ordered include chain from root to the target env.
    ///
    /// For `dev` including `base`, returns `["base", "dev"]`.
    /// For `uat` including `shared` and `shared` including `base`,
    /// returns `["base", "shared", "uat"]`.
    pub fn build_chain(
        &self,
        name: &str,
        declared: &HashMap<String, Environment>,
    ) -> Result<Vec<String>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = name.to_string();

        // Walk upward collecting parents
        loop {
            if visited.contains(&current) {
                chain.push(current.clone());
                return Err(LayerconfError::CyclicInclude {
                    chain: chain.join(" -> "),
                });
            }

            let entry = declared
                .get(&current)
                .ok_or_else(|| not_found(&current, declared))?;

            visited.insert(current.clone());
            chain.push(current.clone());

            match &entry.include {
                Some(include) => current = include.env.clone(),
                None => break,
            }
        }

        // Reverse so root is first, leaf is last
        chain.reverse();
        Ok(chain)
    }

    /// Merge a parent environment into the environment that includes it.
    ///
    /// 1. Parent groups named in the child's `exclude` list are dropped.
    /// 2. A child group with the same name replaces the parent's group in
    ///    place; other child groups are appended.
    /// 3. Components the child lists are removed from inherited groups,
    ///    so the child decides where they live.
    /// 4. `ip` and `port_offset` come from the child when set.
    fn merge(parent: &Environment, child: &Environment) -> Environment {
        let excluded: HashSet<&str> = child
            .include
            .iter()
            .flat_map(|i| i.exclude.iter().map(String::as_str))
            .collect();
        let child_components: HashSet<&str> = child
            .all_components()
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();

        let mut groups: Vec<ComponentGroup> = Vec::new();
        for group in &parent.groups {
            if excluded.contains(group.name.as_str()) {
                continue;
            }
            if let Some(own) = child.groups.iter().find(|g| g.name == group.name) {
                groups.push(own.clone());
                continue;
            }
            let mut inherited = group.clone();
            inherited
                .components
                .retain(|c| !child_components.contains(c.name.as_str()));
            groups.push(inherited);
        }

        for group in &child.groups {
            if !groups.iter().any(|g| g.name == group.name) {
                groups.push(group.clone());
            }
        }

        Environment {
            name: child.name.clone(),
            groups,
            ip: child.ip.clone().or_else(|| parent.ip.clone()),
            port_offset: child.port_offset.or(parent.port_offset),
            include: child.include.clone(),
        }
    }
}

fn not_found(name: &str, declared: &HashMap<String, Environment>) -> LayerconfError {
    let mut available: Vec<&str> = declared.keys().map(String::as_str).collect();
    available.sort_unstable();
    LayerconfError::EnvironmentNotFound {
        name: name.to_string(),
        available: available.join(", "),
    }
}
