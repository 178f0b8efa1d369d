//! Name-based timeline resolution against the root.
//!
//! `resolve` is the everyday entry point: ask for a timeline by name and
//! get the first one anywhere in the tree, or a fresh one if none exists.
//! Lookup searches the whole tree depth-first, but creation always forks
//! directly under the root, even when a deeper timeline of the same name
//! could have been the natural parent.

use tracing::debug;

use crate::error::TrackerError;
use crate::timeline::TimelineKey;
use crate::tracker::Tracker;

impl Tracker {
    /// Resolve a timeline by optional name.
    ///
    /// With no name, returns the root. With a name, returns the first
    /// depth-first match under the root, creating a child of the root if
    /// nothing matches. Resolving the same name twice yields the same
    /// handle.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::DuplicateTimeline`] only if a freshly
    /// generated id collides with an existing child of the root.
    pub fn resolve(&mut self, name: Option<&str>) -> Result<TimelineKey, TrackerError> {
        match name {
            None => Ok(self.root()),
            Some(name) => self.resolve_named(name),
        }
    }

    /// Resolve a timeline by name; see [`resolve`](Self::resolve).
    ///
    /// # Errors
    ///
    /// As for [`resolve`](Self::resolve).
    pub fn resolve_named(&mut self, name: &str) -> Result<TimelineKey, TrackerError> {
        let root = self.root();
        if let Some(found) = self.get_child(root, name)? {
            return Ok(found);
        }
        debug!(name, "resolve created timeline under root");
        self.fork(root, name)
    }
}

#[cfg(test)]
mod tests {
    use houston_types::SequentialIds;

    use crate::clock::ManualClock;
    use crate::config::TrackerConfig;
    use crate::timeline::Timeline;
    use crate::tracker::Tracker;

    fn tracker() -> Tracker {
        Tracker::from_parts(
            TrackerConfig::default(),
            Box::new(SequentialIds::new("t")),
            Box::new(ManualClock::at_epoch_seconds(0)),
        )
    }

    #[test]
    fn no_name_resolves_root() {
        let mut tracker = tracker();
        assert_eq!(tracker.resolve(None), Ok(tracker.root()));
    }

    #[test]
    fn resolving_twice_returns_same_timeline() {
        let mut tracker = tracker();
        let first = tracker.resolve(Some("X"));
        let second = tracker.resolve(Some("X"));
        assert!(first.is_ok());
        assert_eq!(first, second);
        assert_eq!(tracker.len_timelines(), 2);
    }

    #[test]
    fn created_timeline_hangs_off_root() {
        let mut tracker = tracker();
        let root = tracker.root();
        let test0 = tracker.resolve_named("test0").ok();
        assert_eq!(tracker.get_child(root, "test0").ok().flatten(), test0);
        assert_eq!(
            test0.and_then(|t| tracker.timeline(t).ok()).and_then(Timeline::parent),
            Some(root)
        );
    }

    #[test]
    fn nested_name_is_found_not_recreated() {
        let mut tracker = tracker();
        let outer = tracker.resolve_named("test1");
        let inner = outer.clone().and_then(|o| tracker.fork(o, "test2"));
        assert!(inner.is_ok());
        assert_eq!(tracker.resolve_named("test2"), inner);
        assert_eq!(tracker.len_timelines(), 3);
    }

    #[test]
    fn deeper_duplicate_does_not_shadow_earlier_match() {
        let mut tracker = tracker();
        let test0 = tracker.resolve_named("test0");
        let test1 = tracker.resolve_named("test1");
        let nested = test1.clone().and_then(|t| tracker.fork(t, "test0"));
        assert!(nested.is_ok());
        assert_eq!(tracker.resolve_named("test0"), test0);
        assert_eq!(
            test1.and_then(|t| tracker.get_child(t, "test0")).ok().flatten(),
            nested.ok()
        );
    }
}
