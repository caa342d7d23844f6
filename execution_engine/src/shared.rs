//! Configuration shared across the engine.
pub mod chain_kind;
