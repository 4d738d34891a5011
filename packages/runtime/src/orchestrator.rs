//! The orchestrator: owns the shared signal, the outstanding-request
//! tracker, and the host scope handle, and exposes the reset operations.
//!
//! The executor entry points are split by pathway: single-shot dispatch
//! lives in [`crate::single`], streaming dispatch in [`crate::stream`].

use tokio::sync::watch;
use tracing::debug;

use opstate_core::{OperationKind, OperationState};

use crate::config::OrchestratorConfig;
use crate::error::DispatchError;
use crate::scope::HostScope;
use crate::signal::{SharedState, StateSignal};
use crate::tracker::RequestTracker;

/// Drives operations and publishes their status to one shared signal.
///
/// Constructed with the signal at `Idle`. All dispatch entry points and
/// both reset operations write through the same cell; observers subscribe
/// once and watch every operation's lifecycle.
pub struct StateOrchestrator {
    config: OrchestratorConfig,
    pub(crate) signal: StateSignal,
    pub(crate) tracker: RequestTracker,
    pub(crate) scope: HostScope,
}

impl StateOrchestrator {
    /// Creates an orchestrator bound to the given host scope.
    #[must_use]
    pub fn new(config: OrchestratorConfig, scope: HostScope) -> Self {
        let signal = StateSignal::new(&config.component);
        let tracker = RequestTracker::new(config.pending_warn_threshold);
        Self {
            config,
            signal,
            tracker,
            scope,
        }
    }

    /// The configuration this orchestrator was built with.
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// The host scope operations are launched on.
    #[must_use]
    pub fn scope(&self) -> &HostScope {
        &self.scope
    }

    /// Read-only subscription to the shared signal.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SharedState> {
        self.signal.subscribe()
    }

    /// Snapshot of the last published operation state.
    #[must_use]
    pub fn current_state(&self) -> SharedState {
        self.signal.current()
    }

    /// Number of operations still in flight.
    #[must_use]
    pub fn pending_operations(&self) -> usize {
        self.tracker.pending_count()
    }

    /// Clears an error state after the UI has surfaced it.
    ///
    /// # Errors
    ///
    /// Fails with [`DispatchError::StateResetForbidden`] when the shared
    /// signal is not in the error state; the signal is left untouched. The
    /// guard exists so a stray acknowledgement cannot wipe a success or an
    /// in-flight status.
    pub fn acknowledge_error(&self) -> Result<(), DispatchError> {
        let current = self.signal.current();
        if current.is_error() {
            debug!(component = %self.config.component, "error state acknowledged");
            self.signal.publish(OperationState::Idle);
            Ok(())
        } else {
            Err(DispatchError::StateResetForbidden {
                expected: "Error",
                found: current.variant_name(),
            })
        }
    }

    /// Unconditionally forces the shared signal back to idle.
    ///
    /// No precondition, idempotent; intended for host-specific cleanup.
    pub fn reset_state(&self) {
        self.signal.publish(OperationState::Idle);
    }
}

/// Resolves one request and applies the pending-overlay policy: when other
/// requests are still outstanding after a terminal result, the shared
/// signal must not look settled, so it is forced back to a generic loading
/// state.
pub(crate) fn settle_terminal(tracker: &RequestTracker, signal: &StateSignal) {
    if tracker.resolve() > 0 {
        signal.publish(OperationState::Loading(OperationKind::UNSPECIFIED));
    }
}

/// Overlay-only variant for terminal results produced after the request's
/// own tag already resolved (later items of a settled stream).
pub(crate) fn overlay_if_pending(tracker: &RequestTracker, signal: &StateSignal) {
    if tracker.has_pending() {
        signal.publish(OperationState::Loading(OperationKind::UNSPECIFIED));
    }
}
