//! Single-writer async runtime and event stream APIs.

/// Event stream types emitted by collection workers.
pub mod events;
/// Handle and job loop implementation.
pub mod handle;
