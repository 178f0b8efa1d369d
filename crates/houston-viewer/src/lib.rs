//! Terminal viewer for Houston timeline snapshots.
//!
//! Loads a snapshot produced by `Tracker::snapshot_root` (rendered as
//! JSON) and prints the timeline tree with its events.

pub mod error;
pub mod render;

use std::io::Read;
use std::path::Path;

use houston_types::TimelineRecord;
use tracing::debug;

pub use error::ViewerError;
pub use render::{render_tree, summary};

/// Load a snapshot from `path`, or from standard input when `path` is `-`.
///
/// # Errors
///
/// Returns [`ViewerError::Io`] if the input cannot be read, or
/// [`ViewerError::Parse`] if it is not a valid timeline record.
pub fn load_snapshot(path: &Path) -> Result<TimelineRecord, ViewerError> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| ViewerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };
    debug!(path = %path.display(), bytes = text.len(), "read snapshot");
    Ok(TimelineRecord::from_json(&text)?)
}
