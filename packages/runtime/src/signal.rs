//! The shared last-operation-state signal.
//!
//! A single watch-backed cell readable by many observers and writable only
//! by the executors and the reset operations. Receivers observe the latest
//! value, not a history: this is a UI status indicator, not a ledger.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use opstate_core::OperationState;

/// Type-erased success payload carried by the shared signal.
///
/// The typed success hook runs before erasure, so the dispatch path never
/// downcasts; observers that want the payload back use
/// [`StatePayload::downcast_ref`].
#[derive(Clone)]
pub struct StatePayload(Arc<dyn Any + Send + Sync>);

impl StatePayload {
    /// Erases a typed payload.
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Recovers the typed payload, if `T` is what was erased.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for StatePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatePayload(..)")
    }
}

/// The shared signal's value type.
pub type SharedState = OperationState<StatePayload>;

/// Observable cell holding the last operation state.
///
/// Cloneable handle over one watch channel, seeded with `Idle` at
/// construction. Teardown (dropping the final handle) is the host's
/// concern; publishing never fails, even with zero subscribers.
#[derive(Debug, Clone)]
pub struct StateSignal {
    component: Arc<str>,
    tx: Arc<watch::Sender<SharedState>>,
}

impl StateSignal {
    /// Creates a signal at `Idle`, labeled for log events.
    #[must_use]
    pub fn new(component: &str) -> Self {
        let (tx, _rx) = watch::channel(OperationState::Idle);
        Self {
            component: Arc::from(component),
            tx: Arc::new(tx),
        }
    }

    /// Replaces the published state unconditionally.
    pub fn publish(&self, state: SharedState) {
        debug!(
            component = %self.component,
            state = state.variant_name(),
            "operation state published"
        );
        self.tx.send_replace(state);
    }

    /// Read-only subscription to the signal.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SharedState> {
        self.tx.subscribe()
    }

    /// Snapshot of the latest published state.
    #[must_use]
    pub fn current(&self) -> SharedState {
        self.tx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use opstate_core::OperationKind;

    use super::*;

    #[test]
    fn starts_idle() {
        let signal = StateSignal::new("test");
        assert!(signal.current().is_idle());
    }

    #[test]
    fn publish_replaces_the_current_value() {
        let signal = StateSignal::new("test");
        signal.publish(OperationState::Loading(OperationKind::new("fetch")));
        assert!(signal.current().is_loading());

        signal.publish(OperationState::NoContent);
        assert!(signal.current().is_no_content());
    }

    #[tokio::test]
    async fn subscribers_observe_published_values() {
        let signal = StateSignal::new("test");
        let mut rx = signal.subscribe();

        signal.publish(OperationState::Success(StatePayload::new(41_u32)));
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_success());
    }

    #[test]
    fn payload_round_trips_through_erasure() {
        let payload = StatePayload::new("hello".to_string());
        assert_eq!(payload.downcast_ref::<String>().unwrap(), "hello");
        assert!(payload.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn clones_share_the_cell() {
        let signal = StateSignal::new("test");
        let clone = signal.clone();
        clone.publish(OperationState::NoContent);
        assert!(signal.current().is_no_content());
    }
}
