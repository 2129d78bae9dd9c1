//! Domain types shared across the workspace

pub mod mode;
pub mod newtypes;

pub use mode::ReleaseMode;
pub use newtypes::TestName;
