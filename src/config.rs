use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::action::{action_creator, Action};
use crate::error::ConfigError;
use crate::module::ModuleSpec;
use crate::reducer::{reducer, Reducer};
use crate::routes::{route_fn, RouteFn};
use crate::tree::ModuleDescriptor;
use crate::ui::{create_element, Node, Props};

/// A module tree manifest: the root module's configuration.
pub type Manifest = ModuleConfig;

/// Declarative description of one module and its children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,

    /// Declared actions; each gets a creator that attaches the payload
    #[serde(default)]
    pub actions: Vec<String>,

    #[serde(default)]
    pub reducers: BTreeMap<String, ReducerConfig>,

    /// Route rendering (optional, defaults to a plain `div` container)
    #[serde(default)]
    pub routes: Option<RoutesConfig>,

    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

/// Built-in reducer behaviours selectable from a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReducerConfig {
    /// Always yields `value`
    Constant { value: Value },
    /// Integer bumped by `step` on every `on` action
    Counter {
        on: String,
        #[serde(default)]
        initial: i64,
        #[serde(default = "default_step")]
        step: i64,
    },
    /// Array collecting the payload of every `on` action
    Append { on: String },
    /// Payload of the most recent `on` action
    Latest {
        on: String,
        #[serde(default)]
        initial: Value,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            text: None,
        }
    }
}

fn default_step() -> i64 {
    1
}

fn default_tag() -> String {
    "div".to_string()
}

impl ModuleConfig {
    /// Load a manifest from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let manifest = Self::parse(&content)?;
        info!(
            module = %manifest.name,
            modules = manifest.modules.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the entity-style spec for this module and its children.
    pub fn to_spec<S>(&self) -> ModuleSpec<S> {
        let mut spec = ModuleSpec::new(self.name.clone());
        for name in &self.actions {
            let kind = name.clone();
            spec = spec
                .with_action(name.clone())
                .with_action_creator(
                    name.clone(),
                    action_creator(move |payload| Action::with_payload(kind.clone(), payload)),
                );
        }
        for (name, config) in &self.reducers {
            spec = spec.with_reducer(name.clone(), config.to_reducer());
        }
        spec.routes = Some(self.routes_fn());
        spec.submodules = self.modules.iter().map(|m| m.to_spec()).collect();
        spec
    }

    /// Build the plain descriptor for the functional entry points.
    pub fn to_descriptor<S>(&self) -> ModuleDescriptor<S> {
        let mut descriptor =
            ModuleDescriptor::new(self.name.clone()).with_routes(self.routes_fn());
        for (name, config) in &self.reducers {
            descriptor = descriptor.with_reducer(name.clone(), config.to_reducer());
        }
        descriptor.modules = self.modules.iter().map(|m| m.to_descriptor()).collect();
        descriptor
    }

    fn routes_fn<S>(&self) -> RouteFn<S> {
        self.routes.clone().unwrap_or_default().to_routes()
    }
}

impl ReducerConfig {
    pub fn to_reducer(&self) -> Reducer {
        match self.clone() {
            ReducerConfig::Constant { value } => reducer(move |_, _| value.clone()),
            ReducerConfig::Counter { on, initial, step } => reducer(move |state, action| {
                let current = state.as_i64().unwrap_or(initial);
                if action.kind == on {
                    json!(current.saturating_add(step))
                } else {
                    json!(current)
                }
            }),
            ReducerConfig::Append { on } => reducer(move |state, action| {
                let mut items = state.as_array().cloned().unwrap_or_default();
                if action.kind == on {
                    items.push(action.payload.clone());
                }
                Value::Array(items)
            }),
            ReducerConfig::Latest { on, initial } => reducer(move |state, action| {
                if action.kind == on {
                    action.payload.clone()
                } else if state.is_null() {
                    initial.clone()
                } else {
                    state.clone()
                }
            }),
        }
    }
}

impl RoutesConfig {
    /// Renders `<tag>` holding the optional text followed by child routes.
    pub fn to_routes<S>(&self) -> RouteFn<S> {
        let tag = self.tag.clone();
        let text = self.text.clone();
        route_fn(move |args| {
            let mut children: Vec<Node> = text.iter().map(|t| Node::text(t.as_str())).collect();
            children.extend(args.into_children());
            create_element(tag.as_str(), Props::new(), children)
        })
    }
}
