//! Shared type definitions for the Houston event tracker.
//!
//! Types defined here describe the boundary of the tracker: identifiers,
//! severity tags, and the snapshot records produced when a timeline tree
//! is serialized. Records flow downstream to `TypeScript` via `ts-rs` for
//! external viewers.
//!
//! # Modules
//!
//! - [`ids`] -- String identifier wrappers and [`IdGenerator`] strategies
//! - [`enums`] -- Event severity tags
//! - [`records`] -- Serialized event and timeline records

pub mod enums;
pub mod ids;
pub mod records;

pub use enums::EventTag;
pub use ids::{
    DEFAULT_ID_LENGTH, EventId, IdGenerator, RandomIds, SeededIds, SequentialIds, TimelineId,
};
pub use records::{EventData, EventRecord, TimelineRecord};
