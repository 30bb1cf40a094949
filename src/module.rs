//! The composable module entity.
//!
//! A [`Module`] owns its actions, action creators, components, local
//! reducers, a route function and an ordered list of child modules. Two
//! derived views walk the whole subtree on every call:
//!
//! - [`Module::reducers`] merges local reducers with each child's aggregate,
//!   keyed by child name.
//! - [`Module::routes`] wraps each child's route tree in an index-keyed
//!   container and hands the list to this module's route function.
//!
//! One store is shared by the whole tree. Setting it on a module overwrites
//! the store of every descendant, and children attached later inherit it.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::action::{Action, ActionCreator};
use crate::error::{ModuleError, Result};
use crate::reducer::{CombineReducers, Reducer, ReducerMap, StateCombinator};
use crate::routes::{keyed_container, noop_routes, RouteArgs, RouteFn};
use crate::store::Store;
use crate::tree::MAX_DEPTH;
use crate::ui::{Component, Node};

/// Everything needed to construct a [`Module`]. Only `name` is required.
pub struct ModuleSpec<S = Store> {
    pub name: String,
    pub store: Option<Arc<S>>,
    pub actions: HashMap<String, String>,
    pub action_creators: HashMap<String, ActionCreator>,
    pub components: HashMap<String, Component>,
    /// Defaults to a route function that renders nothing.
    pub routes: Option<RouteFn<S>>,
    pub reducers: ReducerMap,
    pub submodules: Vec<ModuleSpec<S>>,
}

impl<S> Default for ModuleSpec<S> {
    fn default() -> Self {
        Self {
            name: String::new(),
            store: None,
            actions: HashMap::new(),
            action_creators: HashMap::new(),
            components: HashMap::new(),
            routes: None,
            reducers: ReducerMap::new(),
            submodules: Vec::new(),
        }
    }
}

impl<S> ModuleSpec<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_store(mut self, store: Arc<S>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_action(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.actions.insert(name.clone(), name);
        self
    }

    pub fn with_action_creator(mut self, name: impl Into<String>, creator: ActionCreator) -> Self {
        self.action_creators.insert(name.into(), creator);
        self
    }

    pub fn with_component(mut self, name: impl Into<String>, component: Component) -> Self {
        self.components.insert(name.into(), component);
        self
    }

    pub fn with_routes(mut self, routes: RouteFn<S>) -> Self {
        self.routes = Some(routes);
        self
    }

    pub fn with_reducer(mut self, name: impl Into<String>, reducer: Reducer) -> Self {
        self.reducers.insert(name.into(), reducer);
        self
    }

    pub fn with_submodule(mut self, submodule: ModuleSpec<S>) -> Self {
        self.submodules.push(submodule);
        self
    }
}

impl<S> std::fmt::Debug for ModuleSpec<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleSpec")
            .field("name", &self.name)
            .field("store", &self.store.is_some())
            .field("actions", &self.actions)
            .field("submodules", &self.submodules)
            .finish_non_exhaustive()
    }
}

pub struct Module<S = Store> {
    name: String,
    store: Option<Arc<S>>,
    actions: HashMap<String, String>,
    action_creators: HashMap<String, ActionCreator>,
    components: HashMap<String, Component>,
    routes: RouteFn<S>,
    reducers: ReducerMap,
    submodules: Vec<Module<S>>,
    /// Nesting level counted from the root, which is at depth 1.
    depth: usize,
}

impl<S> Module<S> {
    /// Build a module and, recursively, its submodules.
    ///
    /// The store is optional here; [`Module::routes`] fails until one is
    /// set. Children inherit this module's store when it has one.
    pub fn new(spec: ModuleSpec<S>) -> Result<Self> {
        Self::build(spec, None, 1)
    }

    /// Like [`Module::new`] but the spec must carry a store.
    pub fn new_attached(spec: ModuleSpec<S>) -> Result<Self> {
        if spec.store.is_none() {
            return Err(ModuleError::MissingStore);
        }
        Self::new(spec)
    }

    fn build(spec: ModuleSpec<S>, inherited: Option<Arc<S>>, depth: usize) -> Result<Self> {
        if depth > MAX_DEPTH {
            return Err(ModuleError::too_deep());
        }
        if spec.name.is_empty() {
            return Err(ModuleError::MissingName);
        }

        let ModuleSpec {
            name,
            store,
            actions,
            action_creators,
            components,
            routes,
            reducers,
            submodules,
        } = spec;

        let mut module = Self {
            name,
            store: inherited.or(store),
            actions: HashMap::new(),
            action_creators: HashMap::new(),
            components,
            routes: routes.unwrap_or_else(noop_routes),
            reducers,
            submodules: Vec::with_capacity(submodules.len()),
            depth,
        };
        module.set_actions(actions);
        module.set_action_creators(action_creators)?;
        for submodule in submodules {
            module.attach(submodule, depth + 1)?;
        }

        debug!(
            module = %module.name,
            submodules = module.submodules.len(),
            has_store = module.store.is_some(),
            "module constructed"
        );
        Ok(module)
    }

    fn attach(&mut self, spec: ModuleSpec<S>, depth: usize) -> Result<()> {
        let child = Self::build(spec, self.store.clone(), depth)?;
        debug!(module = %self.name, submodule = %child.name, "submodule attached");
        self.submodules.push(child);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the module. Sibling uniqueness is not checked.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModuleError::MissingName);
        }
        self.name = name;
        Ok(())
    }

    // ─── Store ───────────────────────────────────────────────────────

    pub fn store(&self) -> Option<&Arc<S>> {
        self.store.as_ref()
    }

    /// Set the store on this module and every descendant, overwriting
    /// whatever they held before.
    pub fn set_store(&mut self, store: Arc<S>) {
        for submodule in &mut self.submodules {
            submodule.set_store(Arc::clone(&store));
        }
        trace!(module = %self.name, "store set");
        self.store = Some(store);
    }

    /// Consume the tree and return it with `store` attached throughout.
    pub fn with_store(mut self, store: Arc<S>) -> Self {
        self.set_store(store);
        self
    }

    // ─── Actions ─────────────────────────────────────────────────────

    pub fn actions(&self) -> &HashMap<String, String> {
        &self.actions
    }

    /// Declare an action. Its dispatch type is its own name.
    pub fn add_action(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.actions.insert(name.clone(), name);
    }

    pub fn remove_action(&mut self, name: &str) {
        self.actions.remove(name);
    }

    /// Replace all actions. Only the keys are used: every action is stored
    /// with its name as dispatch type, whatever value was supplied.
    pub fn set_actions(&mut self, actions: HashMap<String, String>) {
        self.actions.clear();
        for name in actions.into_keys() {
            self.add_action(name);
        }
    }

    /// Dispatch type of a declared action.
    pub fn dispatch_type(&self, name: &str) -> Option<&str> {
        self.actions.get(name).map(String::as_str)
    }

    // ─── Action creators ─────────────────────────────────────────────

    pub fn action_creators(&self) -> &HashMap<String, ActionCreator> {
        &self.action_creators
    }

    /// Register a creator for an already declared action.
    pub fn add_action_creator(
        &mut self,
        name: impl Into<String>,
        creator: ActionCreator,
    ) -> Result<()> {
        let name = name.into();
        if !self.actions.contains_key(&name) {
            return Err(ModuleError::UnknownAction(name));
        }
        self.action_creators.insert(name, creator);
        Ok(())
    }

    pub fn remove_action_creator(&mut self, name: &str) {
        self.action_creators.remove(name);
    }

    /// Replace all action creators. Every entry must name a declared
    /// action; if one does not, nothing is changed.
    pub fn set_action_creators(&mut self, creators: HashMap<String, ActionCreator>) -> Result<()> {
        if let Some(name) = creators.keys().find(|n| !self.actions.contains_key(*n)) {
            return Err(ModuleError::UnknownAction(name.clone()));
        }
        self.action_creators = creators;
        Ok(())
    }

    /// Run the creator registered for `name`.
    pub fn create_action(&self, name: &str, payload: serde_json::Value) -> Option<Action> {
        self.action_creators.get(name).map(|create| create(payload))
    }

    // ─── Components ──────────────────────────────────────────────────

    pub fn components(&self) -> &HashMap<String, Component> {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn set_components(&mut self, components: HashMap<String, Component>) {
        self.components = components;
    }

    // ─── Routes ──────────────────────────────────────────────────────

    pub fn routes_fn(&self) -> &RouteFn<S> {
        &self.routes
    }

    pub fn set_routes(&mut self, routes: RouteFn<S>) {
        self.routes = routes;
    }

    /// Compose the route tree of this module and its whole subtree.
    ///
    /// Fails with [`ModuleError::StoreRequired`] if any visited module has
    /// no store. Nothing is cached; every call walks the subtree again.
    pub fn routes(&self) -> Result<Node> {
        self.routes_at(1)
    }

    fn routes_at(&self, depth: usize) -> Result<Node> {
        if depth > MAX_DEPTH {
            return Err(ModuleError::too_deep());
        }
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| ModuleError::StoreRequired(self.name.clone()))?;

        let routes = self
            .submodules
            .iter()
            .enumerate()
            .map(|(i, submodule)| {
                submodule
                    .routes_at(depth + 1)
                    .map(|node| keyed_container(i, node))
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(module = %self.name, children = routes.len(), "composing routes");
        Ok((self.routes)(RouteArgs {
            routes: Some(routes),
            store,
        }))
    }

    // ─── Reducers ────────────────────────────────────────────────────

    /// This module's own reducers, without any submodule contribution.
    pub fn local_reducers(&self) -> &ReducerMap {
        &self.reducers
    }

    pub fn add_reducer(&mut self, name: impl Into<String>, reducer: Reducer) {
        self.reducers.insert(name.into(), reducer);
    }

    pub fn remove_reducer(&mut self, name: &str) {
        self.reducers.remove(name);
    }

    pub fn set_reducers(&mut self, reducers: ReducerMap) {
        self.reducers.clear();
        for (name, reducer) in reducers {
            self.add_reducer(name, reducer);
        }
    }

    /// Aggregate reducer of this module and its subtree, or `None` if no
    /// module in the subtree contributes state.
    pub fn reducers(&self) -> Result<Option<Reducer>> {
        self.reducers_with(&CombineReducers)
    }

    /// [`Module::reducers`] with a caller-supplied combinator.
    pub fn reducers_with<C>(&self, combinator: &C) -> Result<Option<Reducer>>
    where
        C: StateCombinator + ?Sized,
    {
        self.reducers_at(combinator, 1)
    }

    fn reducers_at<C>(&self, combinator: &C, depth: usize) -> Result<Option<Reducer>>
    where
        C: StateCombinator + ?Sized,
    {
        if depth > MAX_DEPTH {
            return Err(ModuleError::too_deep());
        }

        let mut combined = self.reducers.clone();
        for submodule in &self.submodules {
            if let Some(reducer) = submodule.reducers_at(combinator, depth + 1)? {
                if combined.insert(submodule.name.clone(), reducer).is_some() {
                    warn!(
                        module = %self.name,
                        key = %submodule.name,
                        "submodule reducers overwrite an existing entry"
                    );
                }
            }
        }

        if combined.is_empty() {
            return Ok(None);
        }
        Ok(Some(combinator.combine(combined)))
    }

    // ─── Submodules ──────────────────────────────────────────────────

    pub fn submodules(&self) -> &[Module<S>] {
        &self.submodules
    }

    pub fn submodules_mut(&mut self) -> &mut [Module<S>] {
        &mut self.submodules
    }

    /// Construct a child from `spec` and append it. The child takes this
    /// module's store if one is set.
    ///
    /// Depth is counted from the root of the tree this module belongs to,
    /// so a chain grown one child at a time stops at [`MAX_DEPTH`].
    pub fn add_submodule(&mut self, spec: ModuleSpec<S>) -> Result<()> {
        self.attach(spec, self.depth + 1)
    }

    /// Remove every direct child named `name`.
    pub fn remove_submodule(&mut self, name: &str) {
        self.submodules.retain(|m| m.name != name);
    }

    /// Keep only the direct children named `name`, dropping all others.
    pub fn retain_submodules_named(&mut self, name: &str) {
        self.submodules.retain(|m| m.name == name);
    }

    /// Replace all children. On error the children built so far are kept.
    pub fn set_submodules(&mut self, specs: Vec<ModuleSpec<S>>) -> Result<()> {
        self.submodules.clear();
        for spec in specs {
            self.add_submodule(spec)?;
        }
        Ok(())
    }

    /// Find a descendant by a `/`-separated path of names relative to this
    /// module. An empty path is this module.
    pub fn find(&self, path: &str) -> Option<&Module<S>> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |module, segment| {
                module.submodules.iter().find(|m| m.name == segment)
            })
    }
}

impl<S> std::fmt::Debug for Module<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("store", &self.store.is_some())
            .field("actions", &self.actions)
            .field("reducers", &self.reducers.keys().collect::<Vec<_>>())
            .field("submodules", &self.submodules)
            .finish_non_exhaustive()
    }
}
