use serde_json::json;
use std::sync::Arc;

use crate::ui::{create_element, Node, Props};

/// Tag of the wrapper placed around each child's route tree.
pub const CONTAINER_TAG: &str = "div";

/// What a route function receives.
pub struct RouteArgs<'a, S> {
    /// The already-aggregated, index-keyed route trees of the children.
    /// `None` when a descriptor has no children at all.
    pub routes: Option<Vec<Node>>,
    pub store: &'a Arc<S>,
}

impl<S> RouteArgs<'_, S> {
    /// Children routes, empty when there are none.
    pub fn children(&self) -> Vec<Node> {
        self.routes.clone().unwrap_or_default()
    }

    /// Take the children routes without cloning them.
    pub fn into_children(self) -> Vec<Node> {
        self.routes.unwrap_or_default()
    }
}

/// Produces a module's contribution to the route tree.
pub type RouteFn<S> = Arc<dyn Fn(RouteArgs<'_, S>) -> Node + Send + Sync>;

/// Wrap a closure as a [`RouteFn`].
pub fn route_fn<S, F>(f: F) -> RouteFn<S>
where
    F: Fn(RouteArgs<'_, S>) -> Node + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The default route function: renders nothing.
pub fn noop_routes<S>() -> RouteFn<S> {
    Arc::new(|_| Node::Empty)
}

/// Route function that passes the children through in a plain container.
pub fn passthrough_routes<S>(tag: &'static str) -> RouteFn<S> {
    Arc::new(move |args| create_element(tag, Props::new(), args.into_children()))
}

/// Wrap one child's route tree in a container keyed by its position.
pub fn keyed_container(index: usize, child: Node) -> Node {
    let mut props = Props::new();
    props.insert("key".into(), json!(index));
    create_element(CONTAINER_TAG, props, vec![child])
}
