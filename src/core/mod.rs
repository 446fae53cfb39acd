//! Positionally indexed JSON collection engine.

/// Generic read-modify-write collection store.
pub mod collection;
/// Index parsing and range checks.
pub mod indices;
