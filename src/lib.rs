pub mod action;
pub mod config;
pub mod error;
pub mod module;
pub mod reducer;
pub mod routes;
pub mod store;
/// Functional aggregation over plain descriptors; the store is threaded
/// through as an argument instead of living on the modules.
pub mod tree;
pub mod ui;
