use crate::core::traits::special_key::{SpecialContext, SpecialKey};

/// `name`: the name the component is addressed by (its alias).
pub struct NameKey;

impl SpecialKey for NameKey {
    fn key(&self) -> &str {
        "name"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        Some(ctx.component.name.clone())
    }
}

/// `type`: the folder the component's files come from.
pub struct TypeKey;

impl SpecialKey for TypeKey {
    fn key(&self) -> &str {
        "type"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        Some(ctx.component.type_name.clone())
    }
}

/// `env`: the environment being resolved.
pub struct EnvKey;

impl SpecialKey for EnvKey {
    fn key(&self) -> &str {
        "env"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        Some(ctx.environment.name.clone())
    }
}

/// `group`: the group listing this alias.
pub struct GroupKey;

impl SpecialKey for GroupKey {
    fn key(&self) -> &str {
        "group"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        ctx.environment
            .group_by_component_name(&ctx.component.name)
            .map(|g| g.name.clone())
    }
}

/// `ip`: the ip of the alias's group, else the environment default.
/// Declined for components no group lists.
pub struct IpKey;

impl SpecialKey for IpKey {
    fn key(&self) -> &str {
        "ip"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        ctx.environment
            .ip_of(&ctx.component.name)
            .map(str::to_string)
    }
}

/// `portOffset`: the environment's offset, `0` when unset.
pub struct PortOffsetKey;

impl SpecialKey for PortOffsetKey {
    fn key(&self) -> &str {
        "portOffset"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        Some(ctx.environment.port_offset.unwrap_or(0).to_string())
    }
}

/// `order`: 1-based position of the alias in the environment.
pub struct OrderKey;

impl SpecialKey for OrderKey {
    fn key(&self) -> &str {
        "order"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        ctx.environment
            .order_of(&ctx.component.name)
            .map(|o| o.to_string())
    }
}

/// `folder`: absolute-or-relative path of the component folder.
pub struct FolderKey;

impl SpecialKey for FolderKey {
    fn key(&self) -> &str {
        "folder"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        ctx.folder.map(|p| p.display().to_string())
    }
}

/// `configDir`: root of the configuration repository.
pub struct ConfigDirKey;

impl SpecialKey for ConfigDirKey {
    fn key(&self) -> &str {
        "configDir"
    }

    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String> {
        Some(ctx.config_root.display().to_string())
    }
}

/// `userHome`: home directory of the user running the resolution.
pub struct UserHomeKey;

impl SpecialKey for UserHomeKey {
    fn key(&self) -> &str {
        "userHome"
    }

    fn value(&self, _ctx: &SpecialContext<'_>) -> Option<String> {
        dirs::home_dir().map(|p| p.display().to_string())
    }
}

/// Built-in special keys in lookup priority order.
pub fn standard() -> Vec<Box<dyn SpecialKey>> {
    vec![
        Box::new(NameKey),
        Box::new(TypeKey),
        Box::new(EnvKey),
        Box::new(GroupKey),
        Box::new(IpKey),
        Box::new(PortOffsetKey),
        Box::new(OrderKey),
        Box::new(FolderKey),
        Box::new(ConfigDirKey),
        Box::new(UserHomeKey),
    ]
}
