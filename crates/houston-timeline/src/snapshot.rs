//! Snapshot serialization of a timeline subtree.
//!
//! Walks the tree and produces [`TimelineRecord`]s in placement order.
//! Links to events discarded by a reset are omitted rather than rendered
//! as dangling ids.

use houston_types::{EventRecord, TimelineRecord};

use crate::clock::epoch_seconds;
use crate::error::TrackerError;
use crate::event::{Event, EventKey};
use crate::timeline::TimelineKey;
use crate::tracker::Tracker;

impl Tracker {
    /// Serialize `timeline` and its whole subtree.
    ///
    /// Timelines are visited children first, so each record is assembled
    /// from already-built child records without recursion.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleTimeline`] if `timeline` was discarded.
    pub fn snapshot(&self, timeline: TimelineKey) -> Result<TimelineRecord, TrackerError> {
        let mut built: Vec<TimelineRecord> = Vec::new();
        for key in self.post_order(timeline)? {
            let node = self.timeline(key)?;
            let events = node
                .events()
                .iter()
                .map(|event| self.event(*event).map(|event| self.event_record(event)))
                .collect::<Result<Vec<_>, _>>()?;
            // The last `children().len()` records are this node's children,
            // in fork order.
            let first_child = built.len().saturating_sub(node.children().len());
            let childs = built.split_off(first_child);

            built.push(TimelineRecord {
                tid: node.id().clone(),
                name: node.name().to_owned(),
                begin: epoch_seconds(node.begin()),
                events,
                childs,
                end: node.end().map(epoch_seconds),
            });
        }
        built.pop().ok_or(TrackerError::StaleTimeline(timeline))
    }

    /// Serialize the whole tree from the root.
    ///
    /// # Errors
    ///
    /// Never fails while the tracker upholds its invariants; errors are
    /// propagated from [`snapshot`](Self::snapshot).
    pub fn snapshot_root(&self) -> Result<TimelineRecord, TrackerError> {
        self.snapshot(self.root())
    }

    /// Serialize one event.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleEvent`] if `event` was discarded.
    pub fn snapshot_event(&self, event: EventKey) -> Result<EventRecord, TrackerError> {
        self.event(event).map(|event| self.event_record(event))
    }

    fn event_record(&self, event: &Event) -> EventRecord {
        EventRecord {
            etype: event.event_type().to_owned(),
            tag: event.tag(),
            data: event.data().clone(),
            eid: event.id().clone(),
            timestamp: epoch_seconds(event.timestamp()),
            ancestor: event
                .ancestor()
                .and_then(|key| self.event(key).ok())
                .map(|ancestor| ancestor.id().clone()),
            successors: event
                .successors()
                .iter()
                .filter_map(|key| self.event(*key).ok())
                .map(|successor| successor.id().clone())
                .collect(),
        }
    }
}
