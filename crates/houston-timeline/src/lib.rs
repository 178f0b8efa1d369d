//! In-process event and timeline tracking for the Houston recorder.
//!
//! A [`Tracker`] owns a tree of named [`Timeline`]s rooted at a single
//! root timeline. Each timeline holds [`Event`]s in placement order, and
//! events link causally to the event that triggered them. The whole tree
//! can be serialized to nested [`TimelineRecord`](houston_types::TimelineRecord)s
//! for external inspection.
//!
//! # Modules
//!
//! - [`tracker`] -- The [`Tracker`]: event creation, placement, fork, join, reset.
//! - [`registry`] -- Name-based resolution against the root.
//! - [`snapshot`] -- Serialization of a subtree to records.
//! - [`event`] / [`timeline`] -- Node types and their handles.
//! - [`config`] -- YAML configuration and placement policies.
//! - [`clock`] -- Injectable time sources.
//! - [`shared`] -- A mutex-guarded tracker for multi-threaded hosts.
//!
//! # Usage
//!
//! ```
//! use houston_timeline::{NewEvent, Tracker};
//!
//! let mut tracker = Tracker::new();
//! let a = tracker.resolve(Some("A")).ok();
//! let start = a.and_then(|a| tracker.record(a, NewEvent::new("start")).ok());
//! let step = start.and_then(|s| tracker.trigger(s, NewEvent::new("step")).ok());
//! assert!(step.is_some());
//!
//! let root = tracker.root();
//! assert!(tracker.join(root).is_ok());
//! let dump = tracker.snapshot_root().ok();
//! assert_eq!(dump.map(|d| d.event_count()), Some(2));
//! ```

pub mod arena;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod timeline;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BoundsPolicy, ConfigError, MIN_ID_LENGTH, TrackerConfig, TriggerPolicy};
pub use error::TrackerError;
pub use event::{Event, EventKey, NewEvent};
pub use shared::SharedTracker;
pub use timeline::{Timeline, TimelineKey};
pub use tracker::Tracker;
