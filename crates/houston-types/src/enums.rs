//! Enumeration types shared by the tracker and snapshot consumers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Severity classification attached to every event.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EventTag {
    /// An ordinary occurrence.
    #[default]
    Default,
    /// Something unexpected that did not stop execution.
    Warning,
    /// A failure.
    Error,
    /// A failure attributed to a defect in the recording program.
    Bug,
}

impl EventTag {
    /// The lowercase wire name of this tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Bug => "bug",
        }
    }
}

impl core::fmt::Display for EventTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
