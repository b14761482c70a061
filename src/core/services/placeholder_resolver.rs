use std::collections::HashMap;

use super::expression;
use super::placeholder::{self, Placeholder, Segment};
use super::property_collector::PropertyCollector;
use crate::core::errors::{LayerconfError, Result};
use crate::core::models::component::Component;
use crate::core::models::environment::Environment;
use crate::core::models::property::{Property, PropertyMap, PropertySource, ResolvedProperties};
use crate::core::traits::special_key::{SpecialContext, SpecialKey};

/// Component name used in `${this@key}` to address the component the
/// resolution was requested for.
const THIS: &str = "this";

/// Turns collected properties into literal values.
///
/// Placeholders are expanded recursively, then `#{...}` expressions are
/// evaluated. Other components referenced through `${comp@key}` are
/// collected and resolved on demand within the same call.
#[derive(Clone, Copy)]
pub struct PlaceholderResolver<'a> {
    pub collector: PropertyCollector<'a>,
    /// Tried in order after declared properties.
    pub special_keys: &'a [Box<dyn SpecialKey>],
}

impl<'a> PlaceholderResolver<'a> {
    /// Resolve `raw`, the collected properties of `component` in
    /// `environment`.
    ///
    /// The result holds every declared property with a literal value,
    /// plus one system property per applicable special key that no file
    /// declares.
    ///
    /// # Errors
    ///
    /// - `CyclicResolution` when values reference each other in a loop.
    /// - `UnresolvedPlaceholder` when a key has no value and no default.
    /// - `ExpressionEvaluation` when an expression can't be evaluated.
    /// - Lookup errors for referenced components or environments.
    pub fn resolve(
        &self,
        raw: PropertyMap,
        component: &Component,
        environment: &Environment,
    ) -> Result<ResolvedProperties> {
        let root: ContextId = (component.name.clone(), environment.name.clone());
        let keys: Vec<String> = raw.keys().cloned().collect();

        let mut resolution = Resolution {
            resolver: *self,
            root: root.clone(),
            contexts: HashMap::new(),
            memo: HashMap::new(),
            stack: Vec::new(),
        };
        resolution.contexts.insert(
            root.clone(),
            Context {
                component: component.clone(),
                environment: environment.clone(),
                raw,
            },
        );

        let mut properties = PropertyMap::new();
        for key in keys {
            let Some(value) = resolution.value_of(&root, &key)? else {
                continue;
            };
            let declared = &resolution.contexts[&root].raw[&key];
            properties.insert(key, declared.with_value(value));
        }

        let context = &resolution.contexts[&root];
        for special in self.special_keys {
            if properties.contains_key(special.key()) {
                continue;
            }
            if let Some(value) = special.value(&self.special_context(context)) {
                properties.insert(
                    special.key().to_string(),
                    Property::system(special.key(), value),
                );
            }
        }

        tracing::debug!(
            component = %component,
            env = %environment.name,
            count = properties.len(),
            "Resolved properties"
        );
        Ok(ResolvedProperties { properties })
    }

    fn special_context<'c>(&self, context: &'c Context) -> SpecialContext<'c>
    where
        'a: 'c,
    {
        SpecialContext {
            component: &context.component,
            environment: &context.environment,
            folder: self.collector.tree.folder(&context.component.type_name),
            config_root: self.collector.tree.root(),
        }
    }
}

/// `(component name, environment name)`.
type ContextId = (String, String);

/// A component being resolved within one call.
struct Context {
    component: Component,
    environment: Environment,
    raw: PropertyMap,
}

/// One property lookup on the resolution stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Frame {
    context: ContextId,
    key: String,
}

/// State of a single `resolve` call.
struct Resolution<'a> {
    resolver: PlaceholderResolver<'a>,
    root: ContextId,
    contexts: HashMap<ContextId, Context>,
    memo: HashMap<Frame, String>,
    stack: Vec<Frame>,
}

impl Resolution<'_> {
    /// Literal value of `key` in a context: a declared property first,
    /// then special keys. `None` when neither applies.
    ///
    /// A property merged in through an include is expanded in the
    /// component and environment that declared it, so only `this@`
    /// still points at the root.
    fn value_of(&mut self, id: &ContextId, key: &str) -> Result<Option<String>> {
        let frame = Frame {
            context: id.clone(),
            key: key.to_string(),
        };
        if let Some(value) = self.memo.get(&frame) {
            return Ok(Some(value.clone()));
        }
        if let Some(start) = self.stack.iter().position(|f| *f == frame) {
            return Err(self.cycle_error(start, &frame));
        }

        let context = &self.contexts[id];
        let Some(declared) = context.raw.get(key) else {
            let ctx = self.resolver.special_context(context);
            return Ok(self
                .resolver
                .special_keys
                .iter()
                .filter(|s| s.key() == key)
                .find_map(|s| s.value(&ctx)));
        };
        if let PropertySource::File { component, env, .. } = &declared.source
            && (*component != context.component.type_name || *env != context.environment.name)
            && (component != &id.0 || env != &id.1)
        {
            let owner: ContextId = (component.clone(), env.clone());
            self.ensure_loaded(&owner)?;
            return self.value_of(&owner, key);
        }
        let raw_value = declared.value.clone();

        tracing::trace!(component = %id.0, env = %id.1, key, "Resolving property");
        self.stack.push(frame.clone());
        let resolved = self.expand(id, &raw_value);
        self.stack.pop();

        let resolved = resolved?;
        self.memo.insert(frame, resolved.clone());
        Ok(Some(resolved))
    }

    /// Substitute placeholders, then evaluate expressions.
    fn expand(&mut self, id: &ContextId, value: &str) -> Result<String> {
        let substituted = self.substitute(id, value)?;
        expression::expand(&substituted, &id.0)
    }

    fn substitute(&mut self, id: &ContextId, value: &str) -> Result<String> {
        let mut out = String::with_capacity(value.len());
        for segment in placeholder::segments(value) {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) => out.push_str(&self.placeholder_value(id, &p)?),
            }
        }
        Ok(out)
    }

    /// Value of a placeholder found in a property of context `id`.
    fn placeholder_value(&mut self, id: &ContextId, p: &Placeholder) -> Result<String> {
        let target = self.target(id, p)?;

        if let Some(value) = self.value_of(&target, &p.key)? {
            return Ok(value);
        }

        // Defaults are read in the requesting component.
        match &p.default {
            Some(default) => self.substitute(id, default),
            None => Err(LayerconfError::UnresolvedPlaceholder {
                placeholder: p.raw.clone(),
                component: id.0.clone(),
                env: id.1.clone(),
            }),
        }
    }

    /// The context a placeholder points to, loading it if needed.
    fn target(&mut self, id: &ContextId, p: &Placeholder) -> Result<ContextId> {
        let name = match p.component.as_deref() {
            None => return Ok(id.clone()),
            Some(THIS) => self.root.0.clone(),
            Some(name) => name.to_string(),
        };
        let env = p.env.as_deref().unwrap_or(&id.1);

        let target: ContextId = (name, env.to_string());
        self.ensure_loaded(&target)?;
        Ok(target)
    }

    fn ensure_loaded(&mut self, id: &ContextId) -> Result<()> {
        if !self.contexts.contains_key(id) {
            let context = self.load(id)?;
            self.contexts.insert(id.clone(), context);
        }
        Ok(())
    }

    /// Collect a component referenced from, or included by, another one.
    fn load(&self, (name, env): &ContextId) -> Result<Context> {
        let collector = self.resolver.collector;
        let environment = collector.environments.get(env)?;
        let component = environment
            .component_by_name(name)
            .cloned()
            .unwrap_or_else(|| Component::by_type(name));

        tracing::debug!(component = %component, env = %env, "Loading referenced component");
        let raw = collector.collect(&component.type_name, env)?;
        Ok(Context {
            component,
            environment,
            raw,
        })
    }

    fn cycle_error(&self, start: usize, frame: &Frame) -> LayerconfError {
        let path = self.stack[start..]
            .iter()
            .chain(std::iter::once(frame))
            .map(|f| self.describe(f))
            .collect::<Vec<_>>()
            .join(" -> ");
        LayerconfError::CyclicResolution { path }
    }

    /// `comp@key`, or `comp[env]@key` outside the root environment.
    fn describe(&self, frame: &Frame) -> String {
        let (component, env) = &frame.context;
        if *env == self.root.1 {
            format!("{component}@{}", frame.key)
        } else {
            format!("{component}[{env}]@{}", frame.key)
        }
    }
}
