//! Release policy of a lifetime context

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Mode a test is run in.
///
/// Chosen once when a lifetime context is built and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseMode {
    /// Every registered resource is released on teardown, through its
    /// guardian or its own release capability.
    #[default]
    Clean,

    /// Registration is a no-op; resources are left behind for inspection.
    ///
    /// This cannot prevent releases a resource performs on its own, such as
    /// a `Drop` implementation.
    LeaveDirty,
}

impl ReleaseMode {
    /// Whether registered resources are tracked for release
    #[must_use]
    pub const fn tracks_resources(self) -> bool {
        matches!(self, ReleaseMode::Clean)
    }

    /// Canonical textual form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ReleaseMode::Clean => "clean",
            ReleaseMode::LeaveDirty => "leave-dirty",
        }
    }
}

impl Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clean" => Ok(ReleaseMode::Clean),
            "leave-dirty" | "leave_dirty" | "leavedirty" | "dirty" => Ok(ReleaseMode::LeaveDirty),
            other => Err(Error::configuration(format!(
                "unknown release mode '{other}', expected 'clean' or 'leave-dirty'"
            ))),
        }
    }
}
