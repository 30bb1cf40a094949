use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Dispatch type sent once when a store is created or its reducer replaced.
pub const INIT_ACTION: &str = "@@module-tree/INIT";

/// A dispatchable action: what happened, plus optional data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    pub fn init() -> Self {
        Self::new(INIT_ACTION)
    }

    /// Parse `TYPE` or `TYPE=<json>` as typed on a command line.
    /// A payload that is not valid JSON is kept as a string.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('=') {
            Some((kind, raw)) => {
                let payload = serde_json::from_str(raw)
                    .unwrap_or_else(|_| Value::String(raw.to_string()));
                Self::with_payload(kind, payload)
            }
            None => Self::new(spec),
        }
    }
}

/// Builds an action from caller-supplied data.
pub type ActionCreator = Arc<dyn Fn(Value) -> Action + Send + Sync>;

/// Wrap a closure as an [`ActionCreator`].
pub fn action_creator<F>(f: F) -> ActionCreator
where
    F: Fn(Value) -> Action + Send + Sync + 'static,
{
    Arc::new(f)
}
