//! Capability contracts the execution engine consumes but does not implement.
//!
//! Concrete implementations live in sibling crates: `runtime-local` provides
//! production in-memory implementations, `runtime-noop` the do-nothing
//! defaults.

pub mod rate_limiting;
