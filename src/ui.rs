//! Opaque UI tree produced by route functions.
//!
//! The aggregation engine never inspects nodes; it only nests them. The
//! shape mirrors a virtual-DOM element: a tag, an optional list-position
//! `key`, free-form props and children.

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Element properties. `key` is lifted out by [`create_element`].
pub type Props = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Renders nothing. Returned by the default route function.
    #[default]
    Empty,
    Text(String),
    Element {
        #[serde(rename = "type")]
        tag: String,
        key: Option<String>,
        props: Props,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Node::Element { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    pub fn props(&self) -> Option<&Props> {
        match self {
            Node::Element { props, .. } => Some(props),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

/// Instantiate an element. A `key` prop is removed from `props` and
/// stringified, so a numeric list index `0` becomes the key `"0"`.
pub fn create_element(tag: impl Into<String>, mut props: Props, children: Vec<Node>) -> Node {
    let key = match props.remove("key") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    };
    Node::Element {
        tag: tag.into(),
        key,
        props,
        children,
    }
}

/// A reusable piece of UI rendered from props.
pub type Component = Arc<dyn Fn(&Value) -> Node + Send + Sync>;

/// Wrap a closure as a [`Component`].
pub fn component<F>(f: F) -> Component
where
    F: Fn(&Value) -> Node + Send + Sync + 'static,
{
    Arc::new(f)
}
