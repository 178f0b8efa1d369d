//! End-to-end recording sessions against the public tracker API.
//!
//! Each test builds a tree through `resolve`, `fork`, `record`, and
//! `trigger`, joins it, and inspects the snapshot the way an external
//! viewer would.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::missing_panics_doc
)]

use chrono::TimeDelta;
use houston_timeline::{
    BoundsPolicy, ManualClock, NewEvent, TimelineKey, Tracker, TrackerConfig, TrackerError,
};
use houston_types::{EventId, SequentialIds, TimelineRecord};

fn tracker(config: TrackerConfig) -> (Tracker, ManualClock) {
    let clock = ManualClock::at_epoch_seconds(1_700_000_000);
    let tracker = Tracker::from_parts(
        config,
        Box::new(SequentialIds::new("id")),
        Box::new(clock.clone()),
    );
    (tracker, clock)
}

fn assert_all_joined(record: &TimelineRecord) {
    assert!(record.end.is_some(), "timeline {} has no end", record.name);
    for child in &record.childs {
        assert_all_joined(child);
    }
}

#[test]
fn fork_place_trigger_join_serialize() {
    let (mut tracker, clock) = tracker(TrackerConfig::default());
    let root = tracker.root();

    let a = tracker.fork(root, "A").expect("fork A");
    let start = tracker
        .record(a, NewEvent::new("start"))
        .expect("place start");
    clock.advance(TimeDelta::milliseconds(10));
    let step = tracker
        .trigger(start, NewEvent::new("step"))
        .expect("trigger step");
    clock.advance(TimeDelta::milliseconds(10));
    tracker.join(root).expect("join root");

    let dump = tracker.snapshot_root().expect("snapshot");
    assert_eq!(dump.childs.len(), 1);
    let child = &dump.childs[0];
    assert_eq!(child.name, "A");
    assert_eq!(child.events.len(), 2);
    assert_eq!(child.events[0].etype, "start");
    assert_eq!(child.events[1].etype, "step");
    let start_id = tracker.event(start).expect("start event").id().clone();
    let step_id = tracker.event(step).expect("step event").id().clone();
    assert_eq!(child.events[1].ancestor.as_ref(), Some(&start_id));
    assert_eq!(child.events[0].successors, vec![step_id]);
    assert!(dump.end.is_some());
    assert!(child.end.is_some());
    assert!(child.end <= dump.end);

    let json = serde_json::to_value(&dump).expect("json");
    let event = &json["childs"][0]["events"][1];
    assert_eq!(event["ancestor"], serde_json::json!(start_id.as_str()));
    assert!(event.get("successors").is_none());
    assert!(json["childs"][0]["events"][0].get("ancestor").is_none());
}

#[test]
fn resolve_same_name_twice_yields_same_timeline() {
    let (mut tracker, _) = tracker(TrackerConfig::default());
    let first = tracker.resolve(Some("X")).expect("first resolve");
    let second = tracker.resolve(Some("X")).expect("second resolve");
    assert_eq!(first, second);
    assert_eq!(
        tracker.timeline(first).expect("timeline").id(),
        tracker.timeline(second).expect("timeline").id()
    );
}

/// Mirrors a full recording session: lookup, nesting, placement through
/// resolution, chained triggers, and a final dump of the whole tree.
#[test]
fn recording_session_dump() {
    let (mut tracker, clock) = tracker(TrackerConfig::default());
    let root = tracker.root();

    let test0 = tracker.resolve_named("test0").expect("test0");
    assert_eq!(tracker.get_child(root, "test0").expect("lookup"), Some(test0));
    assert_eq!(tracker.timeline(test0).expect("test0").parent(), Some(root));

    let test1 = tracker.resolve_named("test1").expect("test1");
    let test1_0 = tracker.fork(test1, "test0").expect("nested test0");
    assert_eq!(tracker.timeline(test1_0).expect("nested").parent(), Some(test1));
    assert_eq!(tracker.get_child(test1, "test0").expect("lookup"), Some(test1_0));

    let first = tracker.create_event(NewEvent::new("event #1").id("#000"));
    tracker.place(test0, first).expect("place #000");
    let found = tracker.get_event(test0, "#000").expect("get #000");
    assert_eq!(tracker.event(found).expect("event").event_type(), "event #1");
    assert_eq!(tracker.event(found).expect("event").timeline(), Some(test0));

    tracker
        .trigger(found, NewEvent::new("event #2").id("#001"))
        .expect("trigger #001");
    let second = tracker.get_event(test0, "#001").expect("get #001");
    assert_eq!(tracker.event(second).expect("event").timeline(), Some(test0));

    let test2: TimelineKey = tracker.fork(test1, "test2").expect("test2");
    let mut chain = vec![tracker.record(test2, NewEvent::new("event #3")).expect("#3")];
    for n in 4..=7 {
        clock.advance(TimeDelta::milliseconds(1));
        let last = *chain.last().expect("chain head");
        chain.push(
            tracker
                .trigger(last, NewEvent::new(format!("event #{n}")))
                .expect("trigger"),
        );
    }
    tracker.join(test2).expect("join test2");
    let placed = tracker.timeline(test2).expect("test2").events().to_vec();
    assert_eq!(placed, chain);

    tracker.join(root).expect("join root");
    let dump = tracker.snapshot_root().expect("snapshot");
    assert_all_joined(&dump);
    assert!(dump.is_fully_joined());

    let names: Vec<&str> = dump.childs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["test0", "test1"]);
    let dumped_test1 = &dump.childs[1];
    assert!(dumped_test1.events.is_empty());
    let nested: Vec<&str> = dumped_test1.childs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(nested, vec!["test0", "test2"]);
    assert!(dumped_test1.childs[0].events.is_empty());
    assert_eq!(dumped_test1.childs[1].events.len(), 5);
    assert_eq!(dump.event_count(), 7);

    let text = dump.to_json_pretty().expect("render");
    let parsed = TimelineRecord::from_json(&text).expect("parse");
    assert_eq!(parsed, dump);
}

#[test]
fn lenient_policy_is_declared_and_accepts_late_events() {
    let (mut tracker, clock) = tracker(TrackerConfig::default());
    assert_eq!(tracker.bounds_policy(), BoundsPolicy::Lenient);
    let a = tracker.resolve_named("A").expect("A");
    tracker.join(a).expect("join");
    clock.advance(TimeDelta::seconds(1));
    let late = tracker.record(a, NewEvent::new("late")).expect("late event");
    assert_eq!(tracker.event(late).expect("event").timeline(), Some(a));
}

#[test]
fn strict_policy_is_declared_and_rejects_late_events() {
    let (mut tracker, clock) = tracker(TrackerConfig {
        bounds: BoundsPolicy::Strict,
        ..TrackerConfig::default()
    });
    assert_eq!(tracker.bounds_policy(), BoundsPolicy::Strict);
    let a = tracker.resolve_named("A").expect("A");
    tracker.join(a).expect("join");
    clock.advance(TimeDelta::seconds(1));
    let late = tracker.create_event(NewEvent::new("late").id("late"));
    let err = tracker.place(a, late).expect_err("late placement");
    assert!(matches!(
        err,
        TrackerError::OutOfBounds { ref event, .. } if *event == EventId::new("late")
    ));
    assert_eq!(tracker.event(late).expect("event").timeline(), None);
    assert!(tracker.timeline(a).expect("A").events().is_empty());
}

#[test]
fn reset_starts_a_fresh_session() {
    let (mut tracker, clock) = tracker(TrackerConfig::default());
    let root = tracker.root();
    let old = tracker.resolve_named("session").expect("session");
    tracker
        .record(old, NewEvent::new("work"))
        .expect("record work");
    tracker.join(root).expect("join");
    clock.advance(TimeDelta::seconds(5));

    tracker.reset(root).expect("reset");
    let dump = tracker.snapshot_root().expect("snapshot");
    assert!(dump.childs.is_empty());
    assert!(dump.events.is_empty());
    assert!(dump.end.is_none());
    assert_eq!(dump.begin, 1_700_000_005.0);

    let fresh = tracker.resolve_named("session").expect("fresh session");
    assert_ne!(fresh, old);
    assert!(tracker.timeline(old).is_err());
}
