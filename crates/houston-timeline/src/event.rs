//! Events: immutable records of something that happened.
//!
//! An [`Event`] is owned by the tracker's arena and addressed through an
//! [`EventKey`]. Its identity, kind, tag, payload, and timestamp never
//! change after creation. The only mutable parts are the placement
//! (set once) and the append-only successor list.

use chrono::{DateTime, Utc};
use houston_types::{EventData, EventId, EventTag};

use crate::arena::ArenaIndex;
use crate::timeline::TimelineKey;

/// Handle to an event owned by a [`Tracker`](crate::Tracker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey(pub(crate) ArenaIndex);

impl core::fmt::Display for EventKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// A recorded occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub(crate) id: EventId,
    pub(crate) event_type: String,
    pub(crate) tag: EventTag,
    pub(crate) data: EventData,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) timeline: Option<TimelineKey>,
    pub(crate) ancestor: Option<EventKey>,
    pub(crate) successors: Vec<EventKey>,
}

impl Event {
    pub(crate) fn new(draft: NewEvent, id: EventId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            event_type: draft.event_type,
            tag: draft.tag,
            data: draft.data,
            timestamp,
            timeline: None,
            ancestor: None,
            successors: Vec::new(),
        }
    }

    /// Event identifier.
    pub const fn id(&self) -> &EventId {
        &self.id
    }

    /// Free-form kind.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Severity classification.
    pub const fn tag(&self) -> EventTag {
        self.tag
    }

    /// Caller payload.
    pub const fn data(&self) -> &EventData {
        &self.data
    }

    /// Creation time.
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The timeline this event is placed on, if any.
    pub const fn timeline(&self) -> Option<TimelineKey> {
        self.timeline
    }

    /// The event that triggered this one, if any.
    pub const fn ancestor(&self) -> Option<EventKey> {
        self.ancestor
    }

    /// Events triggered by this one, in trigger order.
    pub fn successors(&self) -> &[EventKey] {
        &self.successors
    }

    /// Whether this event has been placed on a timeline.
    pub const fn is_placed(&self) -> bool {
        self.timeline.is_some()
    }
}

/// Description of an event to create.
///
/// # Examples
///
/// ```
/// use houston_timeline::NewEvent;
/// use houston_types::EventTag;
///
/// let draft = NewEvent::new("disk.full")
///     .tag(EventTag::Warning)
///     .datum("free_bytes", 0)
///     .id("evt-1");
/// assert_eq!(draft.event_type(), "disk.full");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    event_type: String,
    data: EventData,
    id: Option<EventId>,
    tag: EventTag,
}

impl NewEvent {
    /// Start describing an event of the given kind with an empty payload.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            data: EventData::new(),
            id: None,
            tag: EventTag::Default,
        }
    }

    /// Replace the payload.
    #[must_use]
    pub fn data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    /// Add one payload entry.
    #[must_use]
    pub fn datum(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Use a caller-supplied identifier instead of a generated one.
    #[must_use]
    pub fn id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the severity classification.
    #[must_use]
    pub const fn tag(mut self, tag: EventTag) -> Self {
        self.tag = tag;
        self
    }

    /// The kind this event will be created with.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub(crate) fn take_id(&mut self) -> Option<EventId> {
        self.id.take()
    }
}
