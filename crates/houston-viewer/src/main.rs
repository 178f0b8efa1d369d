//! `houstonv`: print a Houston timeline snapshot as an indented tree.
//!
//! ```text
//! houstonv session.timeline
//! some-recorder | houstonv -
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr so
//! the rendered tree can be piped.

use std::path::PathBuf;

use houston_viewer::{ViewerError, load_snapshot, render_tree, summary};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ViewerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(ViewerError::Usage)?;

    let snapshot = load_snapshot(&path)?;
    info!(path = %path.display(), summary = summary(&snapshot), "snapshot loaded");
    print!("{}", render_tree(&snapshot));
    Ok(())
}
