//! Logging setup for the `funcore` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary so embedding callers keep control of their own output.

mod tracing;

pub use self::tracing::{filter_directive, init_tracing};
