//! A thread-safe handle to a tracker.
//!
//! [`Tracker`] mutations take `&mut self`, so sharing one across threads
//! needs a lock. [`SharedTracker`] wraps it in a single coarse-grained
//! [`Mutex`]: every operation runs under the lock and the tree is never
//! observed half-updated.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use houston_types::TimelineRecord;

use crate::error::TrackerError;
use crate::event::{EventKey, NewEvent};
use crate::timeline::TimelineKey;
use crate::tracker::Tracker;

/// Cloneable, lock-protected tracker.
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    inner: Arc<Mutex<Tracker>>,
}

impl SharedTracker {
    /// Wrap a tracker for sharing.
    pub fn new(tracker: Tracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Acquire the lock.
    ///
    /// Tracker operations validate before writing, so a panic in another
    /// holder cannot leave the tree inconsistent; poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Tracker> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the tracker.
    pub fn with<R>(&self, f: impl FnOnce(&mut Tracker) -> R) -> R {
        f(&mut self.lock())
    }

    /// Resolve a timeline by optional name under the lock.
    ///
    /// # Errors
    ///
    /// As for [`Tracker::resolve`].
    pub fn resolve(&self, name: Option<&str>) -> Result<TimelineKey, TrackerError> {
        self.lock().resolve(name)
    }

    /// Resolve `timeline` by name and record an event on it, atomically.
    ///
    /// # Errors
    ///
    /// As for [`Tracker::resolve`] and [`Tracker::record`].
    pub fn record(&self, timeline: Option<&str>, draft: NewEvent) -> Result<EventKey, TrackerError> {
        self.with(|tracker| {
            let key = tracker.resolve(timeline)?;
            tracker.record(key, draft)
        })
    }

    /// Snapshot the whole tree under the lock.
    ///
    /// # Errors
    ///
    /// As for [`Tracker::snapshot_root`].
    pub fn snapshot_root(&self) -> Result<TimelineRecord, TrackerError> {
        self.lock().snapshot_root()
    }
}
