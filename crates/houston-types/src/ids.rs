//! Identifier types and identifier generation strategies.
//!
//! Events and timelines are identified by opaque strings. Callers may
//! supply their own identifiers; otherwise one is drawn from an
//! [`IdGenerator`]. The default generator produces 24-character tokens
//! over `[A-Za-z0-9]` from a non-cryptographic source, which is unique
//! enough for the lifetime of a single process but not guaranteed.

use rand::SeedableRng;
use rand::distr::Alphanumeric;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Length of generated identifiers.
pub const DEFAULT_ID_LENGTH: usize = 24;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(String);

        impl $name {
            /// Wrap a caller-supplied identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Draw a fresh identifier from the given generator.
            pub fn generate(ids: &mut dyn IdGenerator) -> Self {
                Self(ids.next_id())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an event.
    EventId
}

define_id! {
    /// Unique identifier for a timeline.
    TimelineId
}

// ---------------------------------------------------------------------------
// Generation strategies
// ---------------------------------------------------------------------------

/// A source of fresh opaque identifiers.
///
/// Implementations only need to be collision-resistant enough for a
/// single process. Trackers hold one generator and share it between
/// events and timelines.
pub trait IdGenerator: core::fmt::Debug + Send {
    /// Produce the next identifier.
    fn next_id(&mut self) -> String;
}

/// Draws alphanumeric identifiers from the thread-local RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomIds {
    length: usize,
}

impl RandomIds {
    /// Create a generator producing identifiers of `length` characters.
    pub const fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        alphanumeric(&mut rand::rng(), self.length)
    }
}

/// Draws alphanumeric identifiers from a seeded RNG.
///
/// The same seed always yields the same sequence, which makes snapshots
/// reproducible in tests.
#[derive(Debug, Clone)]
pub struct SeededIds {
    rng: SmallRng,
    length: usize,
}

impl SeededIds {
    /// Create a generator seeded with `seed`.
    pub fn new(seed: u64, length: usize) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            length,
        }
    }
}

impl IdGenerator for SeededIds {
    fn next_id(&mut self) -> String {
        alphanumeric(&mut self.rng, self.length)
    }
}

/// Produces `prefix-0`, `prefix-1`, ... in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Create a generator whose identifiers start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

fn alphanumeric<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    rng.sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
