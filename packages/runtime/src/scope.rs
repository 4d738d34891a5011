//! Host execution scope: cancellable launched units of work.
//!
//! Default implementation of the host-scope collaborator interface: a
//! cloneable handle that launches work on the tokio runtime and tears all
//! of it down on shutdown. The engine adds no cancellation tokens of its
//! own and no timeouts; timeout policy belongs to the calls themselves.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to the host's execution scope.
///
/// Clones share one cancellation token: `shutdown` on any handle cancels
/// every unit of work launched through any clone.
#[derive(Debug, Clone, Default)]
pub struct HostScope {
    cancel: CancellationToken,
}

impl HostScope {
    /// Creates a fresh scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches a unit of work that runs concurrently with the caller.
    ///
    /// The work races scope cancellation: once the scope shuts down, the
    /// work is dropped at its next suspension point and the handle resolves
    /// to `None`. Launching on an already shut-down scope yields `None`
    /// without polling the work.
    pub fn launch<F, O>(&self, work: F) -> LaunchHandle<O>
    where
        F: Future<Output = O> + Send + 'static,
        O: Send + 'static,
    {
        let token = self.cancel.clone();
        let inner = tokio::spawn(async move {
            tokio::select! {
                // Checked first so work launched after shutdown never runs.
                biased;
                () = token.cancelled() => None,
                out = work => Some(out),
            }
        });
        LaunchHandle { inner }
    }

    /// Tears down every launched unit of work.
    pub fn shutdown(&self) {
        debug!("host scope shutting down");
        self.cancel.cancel();
    }

    /// True once `shutdown` has been called on any clone.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Completion handle for one launched unit of work.
#[derive(Debug)]
pub struct LaunchHandle<O> {
    inner: JoinHandle<Option<O>>,
}

impl<O> LaunchHandle<O> {
    /// Waits for the work to finish.
    ///
    /// `None` means the scope was shut down (or the work panicked) before a
    /// result was produced.
    pub async fn join(self) -> Option<O> {
        self.inner.await.ok().flatten()
    }
}
