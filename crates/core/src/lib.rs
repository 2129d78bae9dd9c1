//! Core domain types, errors, and constants for `lifeguard`.
//!
//! This crate establishes the building blocks shared by every other crate in
//! the workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing every failure mode of registration and teardown.
//! - **`types`**: The `ReleaseMode` policy and the validated `TestName`.
//! - **`constants`**: Environment variable names and defaults.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{BoxError, Error, Result, ResultExt},
    types::*,
};
