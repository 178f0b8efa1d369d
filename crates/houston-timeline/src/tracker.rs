//! The tracker: owner of the timeline tree and every event.
//!
//! A [`Tracker`] replaces a process-wide root timeline with an explicit
//! context object. It owns the root [`Timeline`], every descendant, and
//! every [`Event`] (placed or not) in two arenas. Callers hold copyable
//! [`TimelineKey`] and [`EventKey`] handles.
//!
//! # Invariants
//!
//! - Exactly one root timeline exists and it has no parent.
//! - An event's placement is set once; a placed event appears in exactly
//!   one timeline's event index, under its own id.
//! - Event ids are unique per timeline; child ids are unique per parent.
//! - Timestamps handed out by the tracker never decrease.
//!
//! All mutations check their preconditions first and only then write, so
//! a returned error means nothing changed.

use chrono::{DateTime, Utc};
use houston_types::{EventId, IdGenerator, RandomIds, TimelineId};
use tracing::{debug, trace};

use crate::arena::Arena;
use crate::clock::{Clock, SystemClock};
use crate::config::{BoundsPolicy, MIN_ID_LENGTH, TrackerConfig, TriggerPolicy};
use crate::error::TrackerError;
use crate::event::{Event, EventKey, NewEvent};
use crate::timeline::{Timeline, TimelineKey};

/// Owner of a timeline tree.
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    last_instant: DateTime<Utc>,
    root: TimelineKey,
    pub(crate) timelines: Arena<Timeline>,
    pub(crate) events: Arena<Event>,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    /// Create a tracker with default configuration, random identifiers,
    /// and the system clock.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create a tracker from configuration, with random identifiers of the
    /// configured length (never shorter than [`MIN_ID_LENGTH`]) and the
    /// system clock.
    pub fn with_config(config: TrackerConfig) -> Self {
        let ids = Box::new(RandomIds::new(config.id_length.max(MIN_ID_LENGTH)));
        Self::from_parts(config, ids, Box::new(SystemClock))
    }

    /// Create a tracker from explicit parts (useful for deterministic
    /// tests).
    pub fn from_parts(
        config: TrackerConfig,
        mut ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let begin = clock.now();
        let root_id = TimelineId::generate(ids.as_mut());
        let mut timelines = Arena::new();
        let root = TimelineKey(timelines.insert(Timeline::new(
            root_id,
            config.root_name.clone(),
            begin,
            None,
        )));
        Self {
            config,
            ids,
            clock,
            last_instant: begin,
            root,
            timelines,
            events: Arena::new(),
        }
    }

    /// The root timeline.
    pub const fn root(&self) -> TimelineKey {
        self.root
    }

    /// The active configuration.
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Which placement policy applies to joined timelines.
    pub const fn bounds_policy(&self) -> BoundsPolicy {
        self.config.bounds
    }

    /// Which policy applies to triggering from unplaced events.
    pub const fn trigger_policy(&self) -> TriggerPolicy {
        self.config.trigger
    }

    /// Number of live timelines, including the root.
    pub const fn len_timelines(&self) -> usize {
        self.timelines.len()
    }

    /// Number of live events, placed or not.
    pub const fn len_events(&self) -> usize {
        self.events.len()
    }

    /// Borrow a timeline.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleTimeline`] if the handle was discarded.
    pub fn timeline(&self, key: TimelineKey) -> Result<&Timeline, TrackerError> {
        self.timelines
            .get(key.0)
            .ok_or(TrackerError::StaleTimeline(key))
    }

    /// Borrow an event.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleEvent`] if the handle was discarded.
    pub fn event(&self, key: EventKey) -> Result<&Event, TrackerError> {
        self.events.get(key.0).ok_or(TrackerError::StaleEvent(key))
    }

    fn timeline_mut(&mut self, key: TimelineKey) -> Result<&mut Timeline, TrackerError> {
        self.timelines
            .get_mut(key.0)
            .ok_or(TrackerError::StaleTimeline(key))
    }

    fn event_mut(&mut self, key: EventKey) -> Result<&mut Event, TrackerError> {
        self.events
            .get_mut(key.0)
            .ok_or(TrackerError::StaleEvent(key))
    }

    /// Read the clock, never returning an instant earlier than the last one.
    fn now(&mut self) -> DateTime<Utc> {
        let reading = self.clock.now();
        if reading > self.last_instant {
            self.last_instant = reading;
        }
        self.last_instant
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    fn build_event(&mut self, mut draft: NewEvent) -> Event {
        let id = draft
            .take_id()
            .unwrap_or_else(|| EventId::generate(self.ids.as_mut()));
        let timestamp = self.now();
        Event::new(draft, id, timestamp)
    }

    /// Create an unplaced event with no ancestor.
    pub fn create_event(&mut self, draft: NewEvent) -> EventKey {
        let event = self.build_event(draft);
        trace!(event = %event.id, etype = event.event_type, "created event");
        EventKey(self.events.insert(event))
    }

    /// Create a successor of `ancestor`.
    ///
    /// The new event records `ancestor` as its cause and is appended to the
    /// ancestor's successors. If the ancestor is placed, the successor is
    /// placed on the same timeline. If it is not, the outcome depends on
    /// the [`TriggerPolicy`].
    ///
    /// # Errors
    ///
    /// - [`TrackerError::StaleEvent`] if `ancestor` was discarded.
    /// - [`TrackerError::Unplaced`] if the ancestor is unplaced and the
    ///   policy is [`TriggerPolicy::RequirePlaced`].
    /// - Any placement error for the ancestor's timeline (duplicate id, or
    ///   out of bounds under [`BoundsPolicy::Strict`]).
    pub fn trigger(&mut self, ancestor: EventKey, draft: NewEvent) -> Result<EventKey, TrackerError> {
        let parent = self.event(ancestor)?;
        let placement = parent.timeline;
        if placement.is_none() && self.config.trigger == TriggerPolicy::RequirePlaced {
            return Err(TrackerError::Unplaced(parent.id.clone()));
        }

        let mut event = self.build_event(draft);
        if let Some(timeline) = placement {
            self.check_placeable(timeline, &event)?;
        }
        event.ancestor = Some(ancestor);

        let key = EventKey(self.events.insert(event));
        self.event_mut(ancestor)?.successors.push(key);
        if let Some(timeline) = placement {
            self.attach(timeline, key)?;
        }
        Ok(key)
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    fn check_placeable(&self, timeline: TimelineKey, event: &Event) -> Result<(), TrackerError> {
        let target = self.timeline(timeline)?;
        if target.event_index.contains_key(&event.id) {
            return Err(TrackerError::DuplicateEvent {
                timeline: target.id.clone(),
                event: event.id.clone(),
            });
        }
        if self.config.bounds == BoundsPolicy::Strict {
            if let Some(end) = target.end {
                if event.timestamp > end {
                    return Err(TrackerError::OutOfBounds {
                        timeline: target.id.clone(),
                        event: event.id.clone(),
                        timestamp: event.timestamp,
                        end,
                    });
                }
            }
        }
        Ok(())
    }

    /// Record the placement of an already-validated event.
    fn attach(&mut self, timeline: TimelineKey, key: EventKey) -> Result<(), TrackerError> {
        let event = self.event_mut(key)?;
        event.timeline = Some(timeline);
        let id = event.id.clone();
        self.timeline_mut(timeline)?.insert_event(id, key);
        Ok(())
    }

    /// Place an unplaced event on `timeline`.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::StaleTimeline`] / [`TrackerError::StaleEvent`] for
    ///   discarded handles.
    /// - [`TrackerError::AlreadyPlaced`] if the event is on a timeline.
    /// - [`TrackerError::DuplicateEvent`] if the id is taken on `timeline`.
    /// - [`TrackerError::OutOfBounds`] under [`BoundsPolicy::Strict`] when
    ///   the event is stamped after the timeline's end.
    pub fn place(&mut self, timeline: TimelineKey, event: EventKey) -> Result<EventKey, TrackerError> {
        let candidate = self.event(event)?;
        if let Some(current) = candidate.timeline {
            let current = self.timeline(current)?;
            return Err(TrackerError::AlreadyPlaced {
                event: candidate.id.clone(),
                timeline: current.id.clone(),
            });
        }
        self.check_placeable(timeline, candidate)?;
        self.attach(timeline, event)?;
        Ok(event)
    }

    /// Create an event and place it on `timeline` in one step.
    ///
    /// # Errors
    ///
    /// Same as [`place`](Self::place), except that the event can never be
    /// already placed.
    pub fn record(&mut self, timeline: TimelineKey, draft: NewEvent) -> Result<EventKey, TrackerError> {
        let event = self.build_event(draft);
        self.check_placeable(timeline, &event)?;
        let key = EventKey(self.events.insert(event));
        self.attach(timeline, key)?;
        Ok(key)
    }

    /// Look up an event placed on `timeline` by its exact id.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if no such event is placed there.
    pub fn get_event(&self, timeline: TimelineKey, id: &str) -> Result<EventKey, TrackerError> {
        let target = self.timeline(timeline)?;
        target.find_event(id).ok_or_else(|| TrackerError::NotFound {
            timeline: target.id.clone(),
            event: id.to_owned(),
        })
    }

    // -----------------------------------------------------------------------
    // Tree structure
    // -----------------------------------------------------------------------

    /// Depth-first search for a timeline named `name`, starting at (and
    /// including) `start`. Children are visited in fork order; the first
    /// match wins.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleTimeline`] if `start` was discarded.
    pub fn get_child(&self, start: TimelineKey, name: &str) -> Result<Option<TimelineKey>, TrackerError> {
        self.timeline(start)?;
        let mut stack = vec![start];
        while let Some(key) = stack.pop() {
            let Some(timeline) = self.timelines.get(key.0) else {
                continue;
            };
            if timeline.name == name {
                return Ok(Some(key));
            }
            stack.extend(timeline.children.iter().rev().copied());
        }
        Ok(None)
    }

    /// Create a child of `parent` with a generated id.
    ///
    /// Sibling names may repeat.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleTimeline`] if `parent` was discarded,
    /// or [`TrackerError::DuplicateTimeline`] on an id collision.
    pub fn fork(&mut self, parent: TimelineKey, name: impl Into<String>) -> Result<TimelineKey, TrackerError> {
        self.timeline(parent)?;
        let id = TimelineId::generate(self.ids.as_mut());
        self.fork_with_id(parent, name, id)
    }

    /// Create a child of `parent` with a caller-supplied id.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleTimeline`] if `parent` was discarded,
    /// or [`TrackerError::DuplicateTimeline`] if a sibling already uses `id`.
    pub fn fork_with_id(
        &mut self,
        parent: TimelineKey,
        name: impl Into<String>,
        id: impl Into<TimelineId>,
    ) -> Result<TimelineKey, TrackerError> {
        let id = id.into();
        let owner = self.timeline(parent)?;
        if owner.child_index.contains_key(&id) {
            return Err(TrackerError::DuplicateTimeline {
                parent: owner.id.clone(),
                child: id,
            });
        }

        let begin = self.now();
        let name = name.into();
        debug!(parent = %owner_id(self, parent), timeline = %id, name, "forked timeline");
        let child = Timeline::new(id.clone(), name, begin, Some(parent));
        let key = TimelineKey(self.timelines.insert(child));
        self.timeline_mut(parent)?.insert_child(id, key);
        Ok(key)
    }

    /// Close `timeline` and every descendant.
    ///
    /// Children are joined before their parent, so every descendant's end
    /// is no later than its ancestor's. Joining again overwrites `end`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleTimeline`] if `timeline` was discarded.
    pub fn join(&mut self, timeline: TimelineKey) -> Result<(), TrackerError> {
        let order = self.post_order(timeline)?;
        for key in &order {
            let end = self.now();
            self.timeline_mut(*key)?.end = Some(end);
        }
        debug!(timeline = %owner_id(self, timeline), closed = order.len(), "joined timeline");
        Ok(())
    }

    /// Discard every event and descendant of `timeline`, then reopen it.
    ///
    /// `begin` is set to now and `end` is cleared; the timeline keeps its
    /// id, name, and parent. Handles to discarded nodes become stale.
    /// Resetting the root also discards unplaced events, reclaiming the
    /// whole tracker for a new recording session.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::StaleTimeline`] if `timeline` was discarded.
    pub fn reset(&mut self, timeline: TimelineKey) -> Result<(), TrackerError> {
        let subtree = self.post_order(timeline)?;
        let mut discarded_events = 0_usize;
        let mut ancestors = Vec::new();
        for key in &subtree {
            let events = self.timeline(*key)?.events.clone();
            for event in events {
                if let Some(removed) = self.events.remove(event.0) {
                    discarded_events = discarded_events.saturating_add(1);
                    ancestors.extend(removed.ancestor);
                }
            }
            if *key != timeline {
                self.timelines.remove(key.0);
            }
        }
        if timeline == self.root {
            self.events.remove_where(|event| event.timeline.is_none());
        }
        self.prune_successors(&ancestors);

        let begin = self.now();
        self.timeline_mut(timeline)?.clear(begin);
        debug!(
            timeline = %owner_id(self, timeline),
            discarded_timelines = subtree.len().saturating_sub(1),
            discarded_events,
            "reset timeline"
        );
        Ok(())
    }

    /// Drop successor links to discarded events from surviving `ancestors`.
    fn prune_successors(&mut self, ancestors: &[EventKey]) {
        for ancestor in ancestors {
            let Some(event) = self.events.get(ancestor.0) else {
                continue;
            };
            let live: Vec<EventKey> = event
                .successors
                .iter()
                .copied()
                .filter(|successor| self.events.contains(successor.0))
                .collect();
            if let Some(event) = self.events.get_mut(ancestor.0) {
                event.successors = live;
            }
        }
    }

    /// Every timeline in the subtree of `start`, children before parents.
    pub(crate) fn post_order(&self, start: TimelineKey) -> Result<Vec<TimelineKey>, TrackerError> {
        self.timeline(start)?;
        let mut order = Vec::new();
        let mut stack = vec![(start, false)];
        while let Some((key, expanded)) = stack.pop() {
            if expanded {
                order.push(key);
                continue;
            }
            let Some(timeline) = self.timelines.get(key.0) else {
                continue;
            };
            stack.push((key, true));
            stack.extend(timeline.children.iter().rev().map(|child| (*child, false)));
        }
        Ok(order)
    }
}

/// Display helper for log fields; stale keys render as their handle.
fn owner_id(tracker: &Tracker, key: TimelineKey) -> String {
    tracker
        .timeline(key)
        .map_or_else(|_| key.to_string(), |timeline| timeline.id.to_string())
}
