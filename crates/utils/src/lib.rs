//! Shared utilities for lifeguard
//!
//! Random identifiers and payloads for fixtures, and the tracing setup used
//! by test binaries.

pub mod random;
pub mod tracing;

pub use random::*;
