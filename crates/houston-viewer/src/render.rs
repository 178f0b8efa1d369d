//! Plain-text rendering of a snapshot tree.
//!
//! Each timeline prints as a header line followed by its events, then its
//! children, indented two spaces per level:
//!
//! ```text
//! root [Xy3...] 0.020s
//!   A [Qk9...] 0.010s
//!     - default start (e1)
//!     - warning step (e2) <- e1
//! ```

use std::fmt::Write as _;

use houston_types::{EventRecord, TimelineRecord};

const INDENT: &str = "  ";

/// Render `record` and its subtree.
pub fn render_tree(record: &TimelineRecord) -> String {
    let mut out = String::new();
    render_timeline(&mut out, record, 0);
    out
}

/// One-line summary of the subtree size.
pub fn summary(record: &TimelineRecord) -> String {
    format!(
        "{} timelines, {} events, depth {}",
        record.timeline_count(),
        record.event_count(),
        record.depth()
    )
}

fn render_timeline(out: &mut String, record: &TimelineRecord, depth: usize) {
    let pad = INDENT.repeat(depth);
    let span = record.end.map_or_else(
        || "open".to_owned(),
        |end| format!("{:.3}s", end - record.begin),
    );
    let name = if record.name.is_empty() {
        "<unnamed>"
    } else {
        record.name.as_str()
    };
    let _ = writeln!(out, "{pad}{name} [{}] {span}", record.tid);

    let event_pad = INDENT.repeat(depth.saturating_add(1));
    for event in &record.events {
        render_event(out, &event_pad, event);
    }
    for child in &record.childs {
        render_timeline(out, child, depth.saturating_add(1));
    }
}

fn render_event(out: &mut String, pad: &str, event: &EventRecord) {
    let _ = write!(out, "{pad}- {} {} ({})", event.tag, event.etype, event.eid);
    if let Some(ancestor) = &event.ancestor {
        let _ = write!(out, " <- {ancestor}");
    }
    out.push('\n');
}
