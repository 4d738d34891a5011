//! Single-shot operation executors.
//!
//! Three entry points share one algorithm and differ only in which hooks
//! fire: the full-featured variant hands the typed payload to the success
//! hook, the empty variant asserts a no-content outcome, and the
//! discarding variant signals success without the payload. The loadable
//! entry point is the simpler fire-and-forget pathway that bypasses the
//! tracker and the shared signal entirely.

use std::future::Future;

use tokio::sync::watch;

use opstate_core::{
    Loadable, MapLoadable, MapOutcome, OperationKind, OperationState, ShapeDescriptor,
};

use crate::classify;
use crate::error::DispatchError;
use crate::orchestrator::{settle_terminal, StateOrchestrator};
use crate::signal::StatePayload;

impl StateOrchestrator {
    /// Runs a one-result call and publishes its status transitions.
    ///
    /// Publishes `Loading(kind)`, registers the request tag, launches the
    /// call on the host scope, maps the raw result, fires `on_success` with
    /// the typed payload (or `on_empty` on a no-content outcome), publishes
    /// the mapped state, and resolves the request -- overlaying a generic
    /// loading state when other requests are still outstanding. The entry
    /// point is transparent: it awaits the launched work and hands back the
    /// call's own raw result.
    ///
    /// # Errors
    ///
    /// Fails fast, before any state mutation, when `shape` is not a single
    /// operation-state declaration (see [`classify::require_single_state`]),
    /// and with [`DispatchError::ScopeShutDown`] when the host scope is
    /// torn down before the call completes.
    pub async fn execute_operation<C, Fut, R, FE, FS>(
        &self,
        call: C,
        shape: ShapeDescriptor,
        kind: OperationKind,
        on_empty: FE,
        on_success: FS,
    ) -> Result<R, DispatchError>
    where
        C: FnOnce() -> Fut,
        Fut: Future<Output = R> + Send + 'static,
        R: MapOutcome + Send + 'static,
        R::Payload: Send + Sync + 'static,
        FE: FnOnce() + Send + 'static,
        FS: FnOnce(&R::Payload) + Send + 'static,
    {
        classify::require_single_state(shape)?;
        self.dispatch_single(call(), shape, kind, move |mapped| match mapped {
            OperationState::Success(data) => on_success(data),
            OperationState::NoContent => on_empty(),
            _ => {}
        })
        .await
    }

    /// Runs a call whose expected terminal outcome is always no-content.
    ///
    /// Same algorithm as [`Self::execute_operation`] with the
    /// success-with-payload hook suppressed; a payload-carrying result is
    /// still published, it just fires no hook.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::execute_operation`].
    pub async fn execute_empty_operation<C, Fut, R, FE>(
        &self,
        call: C,
        shape: ShapeDescriptor,
        kind: OperationKind,
        on_empty: FE,
    ) -> Result<R, DispatchError>
    where
        C: FnOnce() -> Fut,
        Fut: Future<Output = R> + Send + 'static,
        R: MapOutcome + Send + 'static,
        R::Payload: Send + Sync + 'static,
        FE: FnOnce() + Send + 'static,
    {
        classify::require_single_state(shape)?;
        self.dispatch_single(call(), shape, kind, move |mapped| {
            if mapped.is_no_content() {
                on_empty();
            }
        })
        .await
    }

    /// Runs a call whose payload the caller does not need.
    ///
    /// Same algorithm as [`Self::execute_operation`]; `on_success` fires on
    /// a successful outcome but receives no argument.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::execute_operation`].
    pub async fn execute_operation_discarding_data<C, Fut, R, FS>(
        &self,
        call: C,
        shape: ShapeDescriptor,
        kind: OperationKind,
        on_success: FS,
    ) -> Result<R, DispatchError>
    where
        C: FnOnce() -> Fut,
        Fut: Future<Output = R> + Send + 'static,
        R: MapOutcome + Send + 'static,
        R::Payload: Send + Sync + 'static,
        FS: FnOnce() + Send + 'static,
    {
        classify::require_single_state(shape)?;
        self.dispatch_single(call(), shape, kind, move |mapped| {
            if mapped.is_success() {
                on_success();
            }
        })
        .await
    }

    /// Fire-and-forget loading pathway.
    ///
    /// Validates the declaration, launches the call on the host scope, and
    /// immediately returns a per-call signal seeded `Loading` that settles
    /// to the mapped result. Touches neither the shared signal nor the
    /// outstanding-request tracker.
    ///
    /// # Errors
    ///
    /// Fails fast when `shape` is not a loadable declaration (see
    /// [`classify::require_loadable`]).
    pub fn execute_loadable<C, Fut, R>(
        &self,
        call: C,
        shape: ShapeDescriptor,
    ) -> Result<LoadableSignal<R::Payload>, DispatchError>
    where
        C: FnOnce() -> Fut,
        Fut: Future<Output = R> + Send + 'static,
        R: MapLoadable + Send + 'static,
        R::Payload: Send + Sync + 'static,
    {
        classify::require_loadable(shape)?;
        let (tx, rx) = watch::channel(Loadable::Loading);
        let fut = call();
        self.scope.launch(async move {
            let raw = fut.await;
            tx.send_replace(raw.to_loadable());
        });
        Ok(LoadableSignal { rx })
    }

    /// Shared single-shot algorithm; `hook` sees the mapped state once,
    /// before it is erased and published.
    async fn dispatch_single<Fut, R, H>(
        &self,
        fut: Fut,
        shape: ShapeDescriptor,
        kind: OperationKind,
        hook: H,
    ) -> Result<R, DispatchError>
    where
        Fut: Future<Output = R> + Send + 'static,
        R: MapOutcome + Send + 'static,
        R::Payload: Send + Sync + 'static,
        H: FnOnce(&OperationState<R::Payload>) + Send + 'static,
    {
        self.signal.publish(OperationState::Loading(kind));
        self.tracker.register(shape.tag());

        let signal = self.signal.clone();
        let tracker = self.tracker.clone();
        let handle = self.scope.launch(async move {
            let raw = fut.await;
            let mapped = raw.to_state();
            hook(&mapped);
            signal.publish(mapped.map(StatePayload::new));
            settle_terminal(&tracker, &signal);
            raw
        });

        handle.join().await.ok_or(DispatchError::ScopeShutDown)
    }
}

/// Live view of one fire-and-forget load.
///
/// Starts at `Loading` and settles to exactly one terminal value. If the
/// host scope tears the load down first, the signal simply never settles.
#[derive(Debug, Clone)]
pub struct LoadableSignal<T> {
    rx: watch::Receiver<Loadable<T>>,
}

impl<T: Clone> LoadableSignal<T> {
    /// Latest value of the load.
    #[must_use]
    pub fn current(&self) -> Loadable<T> {
        self.rx.borrow().clone()
    }

    /// Waits until the load settles and returns the terminal value.
    ///
    /// Returns the latest observed value (possibly still `Loading`) if the
    /// backing load was torn down before settling.
    pub async fn settled(&mut self) -> Loadable<T> {
        loop {
            {
                let current = self.rx.borrow();
                if !current.is_loading() {
                    return current.clone();
                }
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}
