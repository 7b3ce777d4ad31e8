//! Shared domain types for the stormwatch weather alert engine.

pub mod types;
