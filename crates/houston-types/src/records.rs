//! Snapshot records: the serialized form of a timeline tree.
//!
//! These structs are the boundary format of the tracker. A snapshot is a
//! fully nested [`TimelineRecord`]; each timeline carries its events in
//! placement order and its children in fork order.
//!
//! Field names are fixed by the dump format consumed by external tools:
//!
//! | Record | Field | Presence |
//! |--------|-------|----------|
//! | event | `etype`, `tag`, `data`, `eid`, `timestamp` | always |
//! | event | `ancestor` | iff the event was triggered |
//! | event | `successors` | iff non-empty |
//! | timeline | `tid`, `name`, `begin`, `events`, `childs` | always |
//! | timeline | `end` | iff joined |
//!
//! Timestamps are epoch seconds as floating point.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::EventTag;
use crate::ids::{EventId, TimelineId};

/// Free-form payload attached to an event.
pub type EventData = serde_json::Map<String, serde_json::Value>;

/// Serialized form of a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventRecord {
    /// Event kind.
    pub etype: String,
    /// Severity classification. Dumps without tags read as `default`.
    #[serde(default)]
    pub tag: EventTag,
    /// Caller payload.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub data: EventData,
    /// Event identifier.
    pub eid: EventId,
    /// Creation time in epoch seconds.
    pub timestamp: f64,
    /// Identifier of the triggering event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ancestor: Option<EventId>,
    /// Identifiers of triggered events, in trigger order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub successors: Vec<EventId>,
}

/// Serialized form of a timeline and its whole subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimelineRecord {
    /// Timeline identifier.
    pub tid: TimelineId,
    /// Human-readable label. Dumps keyed only by id read as empty.
    #[serde(default)]
    pub name: String,
    /// Creation (or last reset) time in epoch seconds.
    pub begin: f64,
    /// Events in placement order.
    pub events: Vec<EventRecord>,
    /// Child timelines in fork order.
    pub childs: Vec<TimelineRecord>,
    /// Closing time in epoch seconds, present once joined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub end: Option<f64>,
}

impl TimelineRecord {
    /// Every timeline in this subtree, `self` first, paired with its level
    /// (`self` is level 1).
    fn walk(&self) -> Vec<(&Self, usize)> {
        let mut order = Vec::new();
        let mut stack = vec![(self, 1_usize)];
        while let Some((record, level)) = stack.pop() {
            order.push((record, level));
            let next = level.saturating_add(1);
            stack.extend(record.childs.iter().rev().map(|child| (child, next)));
        }
        order
    }

    /// Total number of events in this subtree.
    pub fn event_count(&self) -> usize {
        self.walk()
            .iter()
            .fold(0, |acc, (record, _)| acc.saturating_add(record.events.len()))
    }

    /// Total number of timelines in this subtree, including `self`.
    pub fn timeline_count(&self) -> usize {
        self.walk().len()
    }

    /// Number of levels in this subtree; a lone timeline has depth 1.
    pub fn depth(&self) -> usize {
        self.walk()
            .iter()
            .map(|(_, level)| *level)
            .max()
            .unwrap_or(1)
    }

    /// Whether this timeline and every descendant carry an `end`.
    pub fn is_fully_joined(&self) -> bool {
        self.walk().iter().all(|(record, _)| record.end.is_some())
    }

    /// Render as indented JSON text.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a snapshot from JSON text.
    ///
    /// Nesting depth is unbounded: a tracker can fork chains of any
    /// length, and every dump it writes must load back.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if the text is not a
    /// valid timeline record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let record = Self::deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(record)
    }
}

impl Drop for TimelineRecord {
    // Flatten the subtree so deep chains do not drop recursively.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.childs);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.childs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(eid: &str) -> EventRecord {
        EventRecord {
            etype: "step".to_owned(),
            tag: EventTag::Default,
            data: EventData::new(),
            eid: EventId::new(eid),
            timestamp: 1.5,
            ancestor: None,
            successors: Vec::new(),
        }
    }

    fn timeline(tid: &str, events: Vec<EventRecord>, childs: Vec<TimelineRecord>) -> TimelineRecord {
        TimelineRecord {
            tid: TimelineId::new(tid),
            name: tid.to_owned(),
            begin: 1.0,
            events,
            childs,
            end: None,
        }
    }

    #[test]
    fn optional_event_fields_are_omitted() {
        let value = serde_json::to_value(event("e0")).unwrap_or_default();
        assert!(value.get("ancestor").is_none());
        assert!(value.get("successors").is_none());
        assert_eq!(value.get("tag").and_then(|v| v.as_str()), Some("default"));
    }

    #[test]
    fn linked_event_fields_are_present() {
        let mut record = event("e1");
        record.ancestor = Some(EventId::new("e0"));
        record.successors = vec![EventId::new("e2")];
        let value = serde_json::to_value(record).unwrap_or_default();
        assert_eq!(value.get("ancestor").and_then(|v| v.as_str()), Some("e0"));
        assert_eq!(
            value.get("successors"),
            Some(&serde_json::json!(["e2"]))
        );
    }

    #[test]
    fn empty_timeline_keeps_events_array() {
        let value = serde_json::to_value(timeline("t", Vec::new(), Vec::new())).unwrap_or_default();
        assert_eq!(value.get("events"), Some(&serde_json::json!([])));
        assert_eq!(value.get("childs"), Some(&serde_json::json!([])));
        assert!(value.get("end").is_none());
    }

    #[test]
    fn untagged_unnamed_dump_parses() {
        let json = r#"{
            "tid": "t0", "begin": 2.0, "childs": [],
            "events": [{"etype": "x", "data": {}, "eid": "e", "timestamp": 2.5}]
        }"#;
        let record = TimelineRecord::from_json(json).ok();
        let record = record.as_ref();
        assert_eq!(record.map(|r| r.name.as_str()), Some(""));
        assert_eq!(
            record.and_then(|r| r.events.first()).map(|e| e.tag),
            Some(EventTag::Default)
        );
    }

    #[test]
    fn subtree_statistics() {
        let leaf = timeline("c", vec![event("e2"), event("e3")], Vec::new());
        let mid = timeline("b", vec![event("e1")], vec![leaf]);
        let root = timeline("a", Vec::new(), vec![mid, timeline("d", Vec::new(), Vec::new())]);
        assert_eq!(root.event_count(), 3);
        assert_eq!(root.timeline_count(), 4);
        assert_eq!(root.depth(), 3);
        assert!(!root.is_fully_joined());
    }

    fn chain(levels: usize) -> TimelineRecord {
        let mut record = timeline("leaf", vec![event("e")], Vec::new());
        for level in 0..levels {
            record = timeline(&format!("t{level}"), Vec::new(), vec![record]);
        }
        record
    }

    #[test]
    fn deeply_nested_dump_loads_back() {
        let record = chain(150);
        assert_eq!(record.depth(), 151);
        let json = record.to_json_pretty().unwrap_or_default();
        let parsed = TimelineRecord::from_json(&json);
        assert!(parsed.is_ok());
        let parsed = parsed.ok();
        assert_eq!(parsed.as_ref().map(TimelineRecord::depth), Some(151));
        assert_eq!(parsed.as_ref().map(TimelineRecord::event_count), Some(1));
        assert_eq!(parsed, Some(record));
    }

    #[test]
    fn very_deep_record_is_measured_and_dropped() {
        let record = chain(100_000);
        assert_eq!(record.depth(), 100_001);
        assert_eq!(record.timeline_count(), 100_001);
        assert!(!record.is_fully_joined());
        drop(record);
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let json = r#"{"tid": "t", "begin": 0.0, "events": [], "childs": []} x"#;
        assert!(TimelineRecord::from_json(json).is_err());
    }
}
