//! State-reduction functions and the combinator that merges them.
//!
//! A combined reducer operates over an object-shaped state whose keys match
//! the keys of the reducer map it was built from. Each keyed reducer only
//! ever sees (and replaces) its own slice.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

use crate::action::Action;

/// A pure `(state, action) -> state` function. `Value::Null` stands for
/// "no state yet" and is what every reducer receives on the init action.
pub type Reducer = Arc<dyn Fn(&Value, &Action) -> Value + Send + Sync>;

/// Named reducers, combined in key order.
pub type ReducerMap = BTreeMap<String, Reducer>;

/// Wrap a closure as a [`Reducer`].
pub fn reducer<F>(f: F) -> Reducer
where
    F: Fn(&Value, &Action) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Merges a map of named reducers into a single reducer.
pub trait StateCombinator {
    fn combine(&self, reducers: ReducerMap) -> Reducer;
}

/// The default combinator, see [`combine_reducers`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CombineReducers;

impl StateCombinator for CombineReducers {
    fn combine(&self, reducers: ReducerMap) -> Reducer {
        combine_reducers(reducers)
    }
}

/// Combine named reducers into one reducer over an object keyed identically.
///
/// Keys present in the incoming state but absent from `reducers` are dropped.
/// A non-object incoming state is treated as empty.
pub fn combine_reducers(reducers: ReducerMap) -> Reducer {
    Arc::new(move |state: &Value, action: &Action| {
        let previous = state.as_object();
        let mut next = Map::with_capacity(reducers.len());
        for (key, reduce) in &reducers {
            let slice = previous.and_then(|m| m.get(key)).unwrap_or(&Value::Null);
            trace!(key = %key, action = %action.kind, "reducing slice");
            next.insert(key.clone(), reduce(slice, action));
        }
        Value::Object(next)
    })
}
