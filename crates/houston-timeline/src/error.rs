//! Error types for the `houston-timeline` crate.
//!
//! Every operation validates its inputs before touching the tree, so an
//! error always leaves the tracker exactly as it was. The tracker never
//! logs or swallows these; they are returned to the caller.

use chrono::{DateTime, Utc};
use houston_types::{EventId, TimelineId};

use crate::event::EventKey;
use crate::timeline::TimelineKey;

/// Errors that can occur during tracker operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// No event with the given id is placed on the timeline.
    #[error("event {event:?} not found on timeline {timeline}")]
    NotFound {
        /// The timeline searched.
        timeline: TimelineId,
        /// The id that was looked up.
        event: String,
    },

    /// The event is stamped after the timeline's closing time.
    #[error("event {event} at {timestamp} is after timeline {timeline} closed at {end}")]
    OutOfBounds {
        /// The closed timeline.
        timeline: TimelineId,
        /// The rejected event.
        event: EventId,
        /// When the event was created.
        timestamp: DateTime<Utc>,
        /// When the timeline was joined.
        end: DateTime<Utc>,
    },

    /// A successor was triggered from an event that is not on a timeline.
    #[error("event {0} is not placed on any timeline")]
    Unplaced(EventId),

    /// The event is already placed on a timeline.
    #[error("event {event} is already placed on timeline {timeline}")]
    AlreadyPlaced {
        /// The event.
        event: EventId,
        /// The timeline it is on.
        timeline: TimelineId,
    },

    /// Another event with the same id is already on the timeline.
    #[error("duplicate event id {event} on timeline {timeline}")]
    DuplicateEvent {
        /// The target timeline.
        timeline: TimelineId,
        /// The conflicting id.
        event: EventId,
    },

    /// A sibling timeline with the same id already exists.
    #[error("duplicate timeline id {child} under timeline {parent}")]
    DuplicateTimeline {
        /// The parent timeline.
        parent: TimelineId,
        /// The conflicting id.
        child: TimelineId,
    },

    /// The timeline handle refers to a node discarded by a reset.
    #[error("stale timeline handle {0}")]
    StaleTimeline(TimelineKey),

    /// The event handle refers to a node discarded by a reset.
    #[error("stale event handle {0}")]
    StaleEvent(EventKey),
}
