//! Timelines: named containers of events, nested into a tree.
//!
//! A [`Timeline`] keeps its events and children twice: once in placement
//! order (for deterministic snapshots) and once indexed by id (for
//! lookup and duplicate detection).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use houston_types::{EventId, TimelineId};

use crate::arena::ArenaIndex;
use crate::event::EventKey;

/// Handle to a timeline owned by a [`Tracker`](crate::Tracker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimelineKey(pub(crate) ArenaIndex);

impl core::fmt::Display for TimelineKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "timeline#{}", self.0)
    }
}

/// A named span of execution holding events and child timelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub(crate) id: TimelineId,
    pub(crate) name: String,
    pub(crate) begin: DateTime<Utc>,
    pub(crate) end: Option<DateTime<Utc>>,
    pub(crate) parent: Option<TimelineKey>,
    pub(crate) children: Vec<TimelineKey>,
    pub(crate) child_index: BTreeMap<TimelineId, TimelineKey>,
    pub(crate) events: Vec<EventKey>,
    pub(crate) event_index: BTreeMap<EventId, EventKey>,
}

impl Timeline {
    pub(crate) const fn new(
        id: TimelineId,
        name: String,
        begin: DateTime<Utc>,
        parent: Option<TimelineKey>,
    ) -> Self {
        Self {
            id,
            name,
            begin,
            end: None,
            parent,
            children: Vec::new(),
            child_index: BTreeMap::new(),
            events: Vec::new(),
            event_index: BTreeMap::new(),
        }
    }

    /// Timeline identifier.
    pub const fn id(&self) -> &TimelineId {
        &self.id
    }

    /// Human-readable label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation time, or the time of the last reset.
    pub const fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    /// Closing time, present once joined.
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Whether [`join`](crate::Tracker::join) has closed this timeline.
    pub const fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    /// The enclosing timeline; `None` only for the root.
    pub const fn parent(&self) -> Option<TimelineKey> {
        self.parent
    }

    /// Child timelines in fork order.
    pub fn children(&self) -> &[TimelineKey] {
        &self.children
    }

    /// Placed events in placement order.
    pub fn events(&self) -> &[EventKey] {
        &self.events
    }

    /// Look up a placed event by id without raising an error.
    pub fn find_event(&self, id: &str) -> Option<EventKey> {
        self.event_index.get(id).copied()
    }

    pub(crate) fn insert_event(&mut self, id: EventId, key: EventKey) {
        self.event_index.insert(id, key);
        self.events.push(key);
    }

    pub(crate) fn insert_child(&mut self, id: TimelineId, key: TimelineKey) {
        self.child_index.insert(id, key);
        self.children.push(key);
    }

    pub(crate) fn clear(&mut self, begin: DateTime<Utc>) {
        self.children.clear();
        self.child_index.clear();
        self.events.clear();
        self.event_index.clear();
        self.begin = begin;
        self.end = None;
    }
}
