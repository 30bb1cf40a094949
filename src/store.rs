//! Minimal shared state container.
//!
//! A `Store` is built from the root's aggregated reducer and shared by
//! every module of a tree through an `Arc`.

use serde_json::Value;
use std::sync::RwLock;
use tracing::debug;

use crate::action::Action;
use crate::reducer::Reducer;

struct Inner {
    reducer: Option<Reducer>,
    state: Value,
}

pub struct Store {
    inner: RwLock<Inner>,
}

impl Store {
    /// Create a store and run the init action through `reducer`.
    /// Without a reducer the tree contributes no state and it stays `Null`.
    pub fn new(reducer: Option<Reducer>) -> Self {
        let state = initial_state(reducer.as_ref());
        Self {
            inner: RwLock::new(Inner { reducer, state }),
        }
    }

    /// Reduce `action` into the current state and return the result.
    pub fn dispatch(&self, action: &Action) -> Value {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if let Some(reduce) = inner.reducer.clone() {
            inner.state = reduce(&inner.state, action);
        }
        debug!(action = %action.kind, "dispatched");
        inner.state.clone()
    }

    pub fn state(&self) -> Value {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.state.clone()
    }

    pub fn has_reducer(&self) -> bool {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.reducer.is_some()
    }

    /// Swap in a re-aggregated reducer. Existing state is kept and the
    /// init action is run again so newly added slices get their defaults.
    pub fn replace_reducer(&self, reducer: Option<Reducer>) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.state = match &reducer {
            Some(reduce) => reduce(&inner.state, &Action::init()),
            None => Value::Null,
        };
        inner.reducer = reducer;
        debug!("reducer replaced");
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("has_reducer", &self.has_reducer())
            .field("state", &self.state())
            .finish()
    }
}

fn initial_state(reducer: Option<&Reducer>) -> Value {
    match reducer {
        Some(reduce) => reduce(&Value::Null, &Action::init()),
        None => Value::Null,
    }
}
