//! Streaming operation executors.
//!
//! Mirrors the single-shot surface over calls that produce a sequence of
//! results. Each emitted item is mapped and published like a single-shot
//! result; the envelope's still-loading flag decides when the operation's
//! request tag may resolve. The caller gets back a live per-operation
//! signal rather than a one-shot return.

use futures_util::{pin_mut, Stream, StreamExt};
use tokio::sync::watch;

use opstate_core::{MapOutcome, OperationKind, OperationState, ShapeDescriptor, Streamed};

use crate::classify;
use crate::error::DispatchError;
use crate::orchestrator::{overlay_if_pending, settle_terminal, StateOrchestrator};
use crate::signal::StatePayload;

impl StateOrchestrator {
    /// Runs a streaming call and republishes its status per emitted item.
    ///
    /// Publishes `Loading(kind)`, registers the request tag, and eagerly
    /// launches the consuming task on the host scope -- the stream is
    /// driven whether or not anyone observes the returned signal. Per item:
    /// map, fire `on_success`/`on_empty`, publish to both the per-operation
    /// signal and the shared signal. Items marked still-loading leave the
    /// tag pending; the first settled item resolves it, and any settled
    /// item overlays a generic loading state while other requests remain
    /// outstanding. The returned signal stays live until the backing stream
    /// completes or the scope tears it down.
    ///
    /// # Errors
    ///
    /// Fails fast, before any state mutation, when `shape` is not a
    /// stream-of-state declaration (see [`classify::require_state_stream`]).
    pub fn execute_stream_operation<C, S, R, FE, FS>(
        &self,
        call: C,
        shape: ShapeDescriptor,
        kind: OperationKind,
        mut on_empty: FE,
        mut on_success: FS,
    ) -> Result<OperationSignal<R::Payload>, DispatchError>
    where
        C: FnOnce() -> S,
        S: Stream<Item = Streamed<R>> + Send + 'static,
        R: MapOutcome + Send + 'static,
        R::Payload: Clone + Send + Sync + 'static,
        FE: FnMut() + Send + 'static,
        FS: FnMut(&R::Payload) + Send + 'static,
    {
        classify::require_state_stream(shape)?;
        self.dispatch_stream(call(), shape, kind, move |mapped| match mapped {
            OperationState::Success(data) => on_success(data),
            OperationState::NoContent => on_empty(),
            _ => {}
        })
    }

    /// Streaming variant whose expected items are always no-content.
    ///
    /// Same algorithm as [`Self::execute_stream_operation`] with the
    /// success-with-payload hook suppressed.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::execute_stream_operation`].
    pub fn execute_empty_stream_operation<C, S, R, FE>(
        &self,
        call: C,
        shape: ShapeDescriptor,
        kind: OperationKind,
        mut on_empty: FE,
    ) -> Result<OperationSignal<R::Payload>, DispatchError>
    where
        C: FnOnce() -> S,
        S: Stream<Item = Streamed<R>> + Send + 'static,
        R: MapOutcome + Send + 'static,
        R::Payload: Clone + Send + Sync + 'static,
        FE: FnMut() + Send + 'static,
    {
        classify::require_state_stream(shape)?;
        self.dispatch_stream(call(), shape, kind, move |mapped| {
            if mapped.is_no_content() {
                on_empty();
            }
        })
    }

    /// Streaming variant whose payloads the caller does not need.
    ///
    /// Same algorithm as [`Self::execute_stream_operation`]; `on_success`
    /// fires per successful item but receives no argument.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::execute_stream_operation`].
    pub fn execute_stream_operation_discarding_data<C, S, R, FS>(
        &self,
        call: C,
        shape: ShapeDescriptor,
        kind: OperationKind,
        mut on_success: FS,
    ) -> Result<OperationSignal<R::Payload>, DispatchError>
    where
        C: FnOnce() -> S,
        S: Stream<Item = Streamed<R>> + Send + 'static,
        R: MapOutcome + Send + 'static,
        R::Payload: Clone + Send + Sync + 'static,
        FS: FnMut() + Send + 'static,
    {
        classify::require_state_stream(shape)?;
        self.dispatch_stream(call(), shape, kind, move |mapped| {
            if mapped.is_success() {
                on_success();
            }
        })
    }

    /// Shared streaming algorithm; `hook` sees each mapped item once,
    /// before it is erased and published.
    fn dispatch_stream<S, R, H>(
        &self,
        source: S,
        shape: ShapeDescriptor,
        kind: OperationKind,
        mut hook: H,
    ) -> Result<OperationSignal<R::Payload>, DispatchError>
    where
        S: Stream<Item = Streamed<R>> + Send + 'static,
        R: MapOutcome + Send + 'static,
        R::Payload: Clone + Send + Sync + 'static,
        H: FnMut(&OperationState<R::Payload>) + Send + 'static,
    {
        self.signal.publish(OperationState::Loading(kind));
        self.tracker.register(shape.tag());

        let (tx, rx) = watch::channel(OperationState::Loading(kind));
        let shared = self.signal.clone();
        let tracker = self.tracker.clone();
        self.scope.launch(async move {
            pin_mut!(source);
            let mut resolved = false;
            while let Some(item) = source.next().await {
                let mapped = item.value.to_state();
                hook(&mapped);
                tx.send_replace(mapped.clone());
                shared.publish(mapped.map(StatePayload::new));
                if item.still_loading {
                    continue;
                }
                if resolved {
                    overlay_if_pending(&tracker, &shared);
                } else {
                    resolved = true;
                    settle_terminal(&tracker, &shared);
                }
            }
            if !resolved {
                // The stream ended without a settled item. Resolve anyway:
                // a leaked tag would pin the shared signal in loading
                // forever on a collaborator bug.
                settle_terminal(&tracker, &shared);
            }
        });
        Ok(OperationSignal { rx })
    }
}

/// Live, continuously observable view of one streaming operation.
///
/// Seeded with the operation's loading state and updated once per emitted
/// item, in emission order. Observers see the latest value; the signal
/// remains active until the backing stream completes or the host scope
/// tears the operation down.
#[derive(Debug, Clone)]
pub struct OperationSignal<T> {
    rx: watch::Receiver<OperationState<T>>,
}

impl<T: Clone> OperationSignal<T> {
    /// Latest value of the operation.
    #[must_use]
    pub fn current(&self) -> OperationState<T> {
        self.rx.borrow().clone()
    }

    /// Waits for the next republished value.
    ///
    /// `None` once the backing stream is gone and no further values will
    /// arrive.
    pub async fn next_value(&mut self) -> Option<OperationState<T>> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use tokio::sync::mpsc;
    use tokio_stream::wrappers::ReceiverStream;

    use crate::config::OrchestratorConfig;
    use crate::scope::HostScope;

    use super::*;

    type RawResult = Result<Option<i32>, String>;
    type Item = Streamed<RawResult>;

    fn make_orchestrator() -> Arc<StateOrchestrator> {
        Arc::new(StateOrchestrator::new(
            OrchestratorConfig::default(),
            HostScope::new(),
        ))
    }

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::stream_of::<i32>()
    }

    fn feed() -> (mpsc::Sender<Item>, ReceiverStream<Item>) {
        let (tx, rx) = mpsc::channel(8);
        (tx, ReceiverStream::new(rx))
    }

    #[tokio::test]
    async fn still_loading_items_defer_tag_resolution() {
        let orch = make_orchestrator();
        let (items_tx, items_rx) = feed();

        let mut signal = orch
            .execute_stream_operation(
                move || items_rx,
                shape(),
                OperationKind::new("watch"),
                || {},
                |_: &i32| {},
            )
            .unwrap();

        assert_eq!(
            signal.current().loading_kind(),
            Some(OperationKind::new("watch"))
        );
        assert_eq!(orch.pending_operations(), 1);

        // Two marked items: mapped values are published in order, but the
        // request stays pending.
        items_tx.send(Streamed::partial(Ok(Some(1)))).await.unwrap();
        assert_eq!(signal.next_value().await, Some(OperationState::Success(1)));
        assert_eq!(orch.pending_operations(), 1);

        items_tx.send(Streamed::partial(Ok(Some(2)))).await.unwrap();
        assert_eq!(signal.next_value().await, Some(OperationState::Success(2)));
        assert_eq!(orch.pending_operations(), 1);

        // The settled item resolves the tag.
        items_tx.send(Streamed::settled(Ok(Some(3)))).await.unwrap();
        assert_eq!(signal.next_value().await, Some(OperationState::Success(3)));
        while orch.pending_operations() != 0 {
            tokio::task::yield_now().await;
        }
        assert!(orch.current_state().is_success());
    }

    #[tokio::test]
    async fn hooks_fire_per_item() {
        let orch = make_orchestrator();
        let (items_tx, items_rx) = feed();
        let successes = Arc::new(AtomicU32::new(0));
        let empties = Arc::new(AtomicU32::new(0));

        let mut signal = orch
            .execute_stream_operation(
                move || items_rx,
                shape(),
                OperationKind::new("watch"),
                {
                    let empties = Arc::clone(&empties);
                    move || {
                        empties.fetch_add(1, Ordering::SeqCst);
                    }
                },
                {
                    let successes = Arc::clone(&successes);
                    move |_: &i32| {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                },
            )
            .unwrap();

        items_tx.send(Streamed::settled(Ok(Some(1)))).await.unwrap();
        signal.next_value().await.unwrap();
        items_tx.send(Streamed::settled(Ok(None))).await.unwrap();
        signal.next_value().await.unwrap();
        items_tx.send(Streamed::settled(Ok(Some(2)))).await.unwrap();
        signal.next_value().await.unwrap();

        assert_eq!(successes.load(Ordering::SeqCst), 2);
        assert_eq!(empties.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stream_is_driven_without_observers() {
        let orch = make_orchestrator();
        let (items_tx, items_rx) = feed();
        let mut shared_rx = orch.subscribe();

        // The returned signal is dropped immediately: activation is eager.
        drop(
            orch.execute_stream_operation(
                move || items_rx,
                shape(),
                OperationKind::new("watch"),
                || {},
                |_: &i32| {},
            )
            .unwrap(),
        );

        items_tx.send(Streamed::settled(Ok(Some(9)))).await.unwrap();
        loop {
            shared_rx.changed().await.unwrap();
            if shared_rx.borrow_and_update().is_success() {
                break;
            }
        }
        while orch.pending_operations() != 0 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn stream_completion_without_a_settled_item_resolves_the_tag() {
        let orch = make_orchestrator();
        let (items_tx, items_rx) = feed();

        let mut signal = orch
            .execute_stream_operation(
                move || items_rx,
                shape(),
                OperationKind::new("watch"),
                || {},
                |_: &i32| {},
            )
            .unwrap();

        items_tx.send(Streamed::partial(Ok(Some(1)))).await.unwrap();
        assert_eq!(signal.next_value().await, Some(OperationState::Success(1)));
        assert_eq!(orch.pending_operations(), 1);

        // Close the stream while the item was still marked loading.
        drop(items_tx);
        assert_eq!(signal.next_value().await, None);
        assert_eq!(orch.pending_operations(), 0);
    }

    #[tokio::test]
    async fn settled_items_overlay_loading_while_other_requests_remain() {
        let orch = make_orchestrator();
        let (items_tx, items_rx) = feed();

        let mut signal = orch
            .execute_stream_operation(
                move || items_rx,
                shape(),
                OperationKind::new("watch"),
                || {},
                |_: &i32| {},
            )
            .unwrap();

        // A second, unrelated request is outstanding.
        orch.tracker.register("other");

        items_tx.send(Streamed::settled(Ok(Some(1)))).await.unwrap();
        assert_eq!(signal.next_value().await, Some(OperationState::Success(1)));
        while orch.pending_operations() != 1 {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            orch.current_state().loading_kind(),
            Some(OperationKind::UNSPECIFIED)
        );

        // Later settled items keep deferring to the outstanding request.
        items_tx.send(Streamed::settled(Ok(Some(2)))).await.unwrap();
        assert_eq!(signal.next_value().await, Some(OperationState::Success(2)));
        assert_eq!(orch.pending_operations(), 1);
        assert_eq!(
            orch.current_state().loading_kind(),
            Some(OperationKind::UNSPECIFIED)
        );
    }

    #[tokio::test]
    async fn empty_stream_variant_fires_the_empty_hook() {
        let orch = make_orchestrator();
        let (items_tx, items_rx) = feed();
        let empties = Arc::new(AtomicU32::new(0));

        let mut signal = orch
            .execute_empty_stream_operation(
                move || items_rx,
                shape(),
                OperationKind::new("purge"),
                {
                    let empties = Arc::clone(&empties);
                    move || {
                        empties.fetch_add(1, Ordering::SeqCst);
                    }
                },
            )
            .unwrap();

        items_tx.send(Streamed::settled(Ok(None))).await.unwrap();
        assert_eq!(
            signal.next_value().await,
            Some(OperationState::<i32>::NoContent)
        );
        assert_eq!(empties.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn discarding_stream_variant_counts_successes() {
        let orch = make_orchestrator();
        let (items_tx, items_rx) = feed();
        let successes = Arc::new(AtomicU32::new(0));

        let mut signal = orch
            .execute_stream_operation_discarding_data(
                move || items_rx,
                shape(),
                OperationKind::new("watch"),
                {
                    let successes = Arc::clone(&successes);
                    move || {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                },
            )
            .unwrap();

        items_tx.send(Streamed::settled(Ok(Some(1)))).await.unwrap();
        signal.next_value().await.unwrap();
        assert_eq!(successes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_shapes_fail_fast_without_touching_any_state() {
        let orch = make_orchestrator();
        let (_items_tx, items_rx) = feed();

        let err = orch
            .execute_stream_operation(
                move || items_rx,
                ShapeDescriptor::state_of::<i32>(),
                OperationKind::new("watch"),
                || {},
                |_: &i32| {},
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArgument { .. }));

        let (_items_tx2, items_rx2) = feed();
        let err = orch
            .execute_stream_operation(
                move || items_rx2,
                ShapeDescriptor::unit(),
                OperationKind::new("watch"),
                || {},
                |_: &i32| {},
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::WrongGenericsAutoCast { .. }));

        assert!(orch.current_state().is_idle());
        assert_eq!(orch.pending_operations(), 0);
    }
}
