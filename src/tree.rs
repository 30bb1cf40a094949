//! Stateless aggregation over plain module descriptors.
//!
//! These functions take a descriptor tree instead of a [`crate::module::Module`]
//! and own no store: the store is threaded through [`derive_routes`] as an
//! argument and handed to each route function along the way.

use std::sync::Arc;
use tracing::trace;

use crate::error::{ModuleError, Result};
use crate::reducer::{CombineReducers, Reducer, ReducerMap, StateCombinator};
use crate::routes::{keyed_container, RouteArgs, RouteFn};
use crate::store::Store;
use crate::ui::Node;

/// Deepest module nesting accepted by construction and aggregation.
pub const MAX_DEPTH: usize = 64;

/// Plain data shape of a module for the functional entry points.
pub struct ModuleDescriptor<S = Store> {
    pub name: String,
    pub modules: Vec<ModuleDescriptor<S>>,
    pub reducers: ReducerMap,
    /// Required by [`derive_routes`]; there is no default here.
    pub routes: Option<RouteFn<S>>,
}

impl<S> ModuleDescriptor<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
            reducers: ReducerMap::new(),
            routes: None,
        }
    }

    pub fn with_module(mut self, module: ModuleDescriptor<S>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_reducer(mut self, name: impl Into<String>, reducer: Reducer) -> Self {
        self.reducers.insert(name.into(), reducer);
        self
    }

    pub fn with_routes(mut self, routes: RouteFn<S>) -> Self {
        self.routes = Some(routes);
        self
    }
}

impl<S> std::fmt::Debug for ModuleDescriptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("modules", &self.modules)
            .field("reducers", &self.reducers.keys().collect::<Vec<_>>())
            .field("routes", &self.routes.is_some())
            .finish()
    }
}

/// Aggregate the reducers of `module` and all its descendants.
///
/// Every child whose own aggregate is non-empty is written into
/// `module.reducers` under the child's name, so the descriptor is mutated
/// in place. Returns `None` when nothing in the subtree has reducers.
pub fn derive_reducers<S>(module: &mut ModuleDescriptor<S>) -> Result<Option<Reducer>> {
    derive_reducers_with(module, &CombineReducers)
}

/// [`derive_reducers`] with a caller-supplied combinator.
pub fn derive_reducers_with<S, C>(
    module: &mut ModuleDescriptor<S>,
    combinator: &C,
) -> Result<Option<Reducer>>
where
    C: StateCombinator + ?Sized,
{
    reducers_at(module, combinator, 1)
}

fn reducers_at<S, C>(
    module: &mut ModuleDescriptor<S>,
    combinator: &C,
    depth: usize,
) -> Result<Option<Reducer>>
where
    C: StateCombinator + ?Sized,
{
    if depth > MAX_DEPTH {
        return Err(ModuleError::too_deep());
    }
    trace!(module = %module.name, depth, "deriving reducers");

    for child in &mut module.modules {
        if let Some(reducer) = reducers_at(child, combinator, depth + 1)? {
            module.reducers.insert(child.name.clone(), reducer);
        }
    }

    if module.reducers.is_empty() {
        return Ok(None);
    }
    Ok(Some(combinator.combine(module.reducers.clone())))
}

/// Compose the route tree of `module` and all its descendants.
///
/// Each child's tree is wrapped in a container keyed by its index and the
/// resulting list is passed to the module's own route function together
/// with `store`. A descriptor without children passes `routes: None`.
pub fn derive_routes<S>(module: &ModuleDescriptor<S>, store: &Arc<S>) -> Result<Node> {
    routes_at(module, store, 1)
}

fn routes_at<S>(module: &ModuleDescriptor<S>, store: &Arc<S>, depth: usize) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(ModuleError::too_deep());
    }
    trace!(module = %module.name, depth, "deriving routes");

    let routes = if module.modules.is_empty() {
        None
    } else {
        let wrapped = module
            .modules
            .iter()
            .enumerate()
            .map(|(i, child)| {
                routes_at(child, store, depth + 1).map(|node| keyed_container(i, node))
            })
            .collect::<Result<Vec<_>>>()?;
        Some(wrapped)
    };

    let render = module
        .routes
        .as_ref()
        .ok_or_else(|| ModuleError::MissingRoutes(module.name.clone()))?;
    Ok(render(RouteArgs { routes, store }))
}
