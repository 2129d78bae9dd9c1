//! Configuration for lifeguard
//!
//! Lifetime contexts read their default release mode and naming rules from a
//! `LifetimeConfig`, assembled from defaults, an optional JSON file and
//! `LIFEGUARD_*` environment variables.

pub mod config;
pub mod loader;


pub use config::LifetimeConfig;
pub use loader::ConfigLoader;
