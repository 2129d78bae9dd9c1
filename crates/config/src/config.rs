//! Settings shared by every lifetime context of a test run
//!
//! The configuration is immutable after construction and cheap to clone.

use lifeguard_core::{
    Error, ReleaseMode, Result, DEFAULT_TEST_NAME_LENGTH, MAX_TEST_NAME_LENGTH,
};
use serde::{Deserialize, Serialize};

/// Settings applied to lifetime contexts built from a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct LifetimeConfig {
    /// Release mode used when a context does not pick one explicitly
    pub default_mode: ReleaseMode,

    /// Length of generated test names
    pub test_name_length: usize,

    /// Panic when teardown fails inside `Drop` instead of only logging it
    pub strict_drop: bool,
}

impl Default for LifetimeConfig {
    fn default() -> Self {
        Self {
            default_mode: ReleaseMode::Clean,
            test_name_length: DEFAULT_TEST_NAME_LENGTH,
            strict_drop: true,
        }
    }
}

impl LifetimeConfig {
    /// Load from the process environment, see [`crate::ConfigLoader`]
    pub fn from_env() -> Result<Self> {
        crate::ConfigLoader::new().load()
    }

    /// Load using `lookup` in place of the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        crate::ConfigLoader::new().load_from(lookup)
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the default release mode
    #[must_use]
    pub fn with_default_mode(mut self, mode: ReleaseMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Set the generated test name length
    #[must_use]
    pub fn with_test_name_length(mut self, length: usize) -> Self {
        self.test_name_length = length;
        self
    }

    /// Set whether teardown failures in `Drop` panic
    #[must_use]
    pub fn with_strict_drop(mut self, strict: bool) -> Self {
        self.strict_drop = strict;
        self
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.test_name_length == 0 || self.test_name_length > MAX_TEST_NAME_LENGTH {
            return Err(Error::configuration(format!(
                "test_name_length must be between 1 and {MAX_TEST_NAME_LENGTH}, got {}",
                self.test_name_length
            )));
        }
        Ok(())
    }
}
