//! Error types for module construction, aggregation and manifest loading.

use crate::tree::MAX_DEPTH;

pub type Result<T> = std::result::Result<T, ModuleError>;

/// Invariant violations raised at the call that breaks them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("required property `name` was not passed")]
    MissingName,
    #[error("required property `store` was not passed")]
    MissingStore,
    #[error("cannot add an action creator for action `{0}` that does not exist")]
    UnknownAction(String),
    #[error("module `{0}` has no store; attach one before reading routes")]
    StoreRequired(String),
    #[error("module `{0}` has no routes function")]
    MissingRoutes(String),
    #[error("module tree is deeper than {max} levels")]
    TooDeep { max: usize },
}

impl ModuleError {
    pub(crate) fn too_deep() -> Self {
        ModuleError::TooDeep { max: MAX_DEPTH }
    }
}

/// Errors from loading a module tree manifest.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read manifest: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Module(#[from] ModuleError),
}
