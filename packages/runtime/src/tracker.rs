//! Outstanding-request bookkeeping.
//!
//! A FIFO queue of request tags, one per operation currently in flight.
//! Order is bookkeeping only -- never priority -- and exists so the engine
//! can answer "is anything still pending" while requests overlap. The
//! shared signal may only leave loading once this queue is empty.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

/// Tag identifying one outstanding request, derived from the stringified
/// declared result type. Tags are a multiset: duplicates are legitimate.
pub type RequestTag = &'static str;

/// FIFO multiset of in-flight request tags.
///
/// A tag is enqueued exactly once when its operation enters loading and
/// dequeued exactly once when the operation reaches a reportable result.
/// Cloning shares the underlying queue.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug)]
struct TrackerInner {
    queue: Mutex<VecDeque<RequestTag>>,
    warn_threshold: usize,
}

impl RequestTracker {
    /// Creates an empty tracker that warns once the pending queue grows
    /// beyond `warn_threshold`.
    #[must_use]
    pub fn new(warn_threshold: usize) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                queue: Mutex::new(VecDeque::new()),
                warn_threshold,
            }),
        }
    }

    /// Appends a tag; called once per operation on entering loading.
    pub fn register(&self, tag: RequestTag) {
        let mut queue = self.inner.queue.lock();
        queue.push_back(tag);
        if queue.len() > self.inner.warn_threshold {
            warn!(
                pending = queue.len(),
                threshold = self.inner.warn_threshold,
                "outstanding-request queue unusually deep"
            );
        }
        debug!(tag, pending = queue.len(), "request registered");
    }

    /// Removes the oldest tag and returns how many requests remain pending.
    ///
    /// Pop and count share one critical section, so the caller's decision to
    /// overlay a generic loading state cannot race a sibling resolution.
    /// Resolving an empty tracker is a no-op that returns zero.
    pub fn resolve(&self) -> usize {
        let mut queue = self.inner.queue.lock();
        let resolved = queue.pop_front();
        debug!(tag = resolved, pending = queue.len(), "request resolved");
        queue.len()
    }

    /// True while any request remains in flight.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.inner.queue.lock().is_empty()
    }

    /// Number of requests currently in flight.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Snapshot of the pending tags in FIFO order, for diagnostics.
    #[must_use]
    pub fn pending_tags(&self) -> Vec<RequestTag> {
        self.inner.queue.lock().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn register_and_resolve_maintain_fifo_order() {
        let tracker = RequestTracker::new(32);
        tracker.register("first");
        tracker.register("second");
        tracker.register("third");
        assert_eq!(tracker.pending_tags(), vec!["first", "second", "third"]);

        assert_eq!(tracker.resolve(), 2);
        assert_eq!(tracker.pending_tags(), vec!["second", "third"]);

        assert_eq!(tracker.resolve(), 1);
        assert_eq!(tracker.resolve(), 0);
        assert!(!tracker.has_pending());
    }

    #[test]
    fn duplicate_tags_are_counted_separately() {
        let tracker = RequestTracker::new(32);
        tracker.register("same");
        tracker.register("same");
        assert_eq!(tracker.pending_count(), 2);

        assert_eq!(tracker.resolve(), 1);
        assert!(tracker.has_pending());
        assert_eq!(tracker.resolve(), 0);
    }

    #[test]
    fn resolving_an_empty_tracker_is_a_no_op() {
        let tracker = RequestTracker::new(32);
        assert_eq!(tracker.resolve(), 0);
        assert!(!tracker.has_pending());
    }

    #[test]
    fn clones_share_the_queue() {
        let tracker = RequestTracker::new(32);
        let clone = tracker.clone();
        tracker.register("shared");
        assert_eq!(clone.pending_count(), 1);
        clone.resolve();
        assert_eq!(tracker.pending_count(), 0);
    }

    proptest! {
        /// For any interleaving of registrations and resolutions, the
        /// pending count equals registrations minus resolutions, floored at
        /// zero, and `resolve` always reports the post-pop length.
        #[test]
        fn pending_count_tracks_the_interleaving(ops in prop::collection::vec(any::<bool>(), 0..64)) {
            let tracker = RequestTracker::new(1024);
            let mut expected = 0_usize;
            for register in ops {
                if register {
                    tracker.register("op");
                    expected += 1;
                } else {
                    expected = expected.saturating_sub(1);
                    prop_assert_eq!(tracker.resolve(), expected);
                }
                prop_assert_eq!(tracker.pending_count(), expected);
            }
        }
    }
}
