//! Configuration loader for lifeguard
//!
//! Sources, highest priority first: `LIFEGUARD_*` variables, the JSON file
//! named by `LIFEGUARD_CONFIG` (or set explicitly), built-in defaults.

use crate::config::LifetimeConfig;
use lifeguard_core::{
    constants::{
        LIFEGUARD_CONFIG_VAR, LIFEGUARD_MODE_VAR, LIFEGUARD_STRICT_DROP_VAR,
        LIFEGUARD_TEST_NAME_LENGTH_VAR,
    },
    Error, ReleaseMode, Result, ResultExt,
};
use std::fs;
use std::path::PathBuf;

/// Loader assembling a [`LifetimeConfig`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Explicit configuration file, overrides `LIFEGUARD_CONFIG`
    file: Option<PathBuf>,
    /// Whether `LIFEGUARD_*` variables are consulted
    use_environment: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            file: None,
            use_environment: true,
        }
    }

    /// Read this JSON file instead of the one named by `LIFEGUARD_CONFIG`
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Ignore `LIFEGUARD_*` variables entirely
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    /// Load the configuration from the process environment
    pub fn load(self) -> Result<LifetimeConfig> {
        self.load_from(|key| std::env::var(key).ok())
    }

    /// Load the configuration using `lookup` to read variables
    pub fn load_from<F>(self, lookup: F) -> Result<LifetimeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            if self.use_environment {
                lookup(key).filter(|value| !value.trim().is_empty())
            } else {
                None
            }
        };

        let file = self
            .file
            .clone()
            .or_else(|| read(LIFEGUARD_CONFIG_VAR).map(PathBuf::from));

        let mut config = match file {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading lifetime configuration file");
                let contents = fs::read_to_string(&path)
                    .map_err(|e| Error::file_system(&path, "read configuration", e))?;
                LifetimeConfig::from_json_str(&contents).with_context(|| path.display())?
            }
            None => LifetimeConfig::default(),
        };

        if let Some(mode) = read(LIFEGUARD_MODE_VAR) {
            config.default_mode = mode.parse::<ReleaseMode>()?;
        }

        if let Some(length) = read(LIFEGUARD_TEST_NAME_LENGTH_VAR) {
            config.test_name_length = length.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{LIFEGUARD_TEST_NAME_LENGTH_VAR} must be a positive integer, got '{length}'"
                ))
            })?;
        }

        if let Some(strict) = read(LIFEGUARD_STRICT_DROP_VAR) {
            config.strict_drop = parse_flag(LIFEGUARD_STRICT_DROP_VAR, &strict)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "{variable} must be a boolean flag, got '{value}'"
        ))),
    }
}
