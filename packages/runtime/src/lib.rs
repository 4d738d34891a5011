//! `opstate` Runtime — operation executors, shared status signal, and
//! outstanding-request tracking.
//!
//! This crate implements the dispatch pipeline around the value types of
//! `opstate-core`:
//!
//! 1. **Classification** (`classify`): `ShapeDescriptor` -> pathway
//!    validation, fail-fast before any side effect
//! 2. **Tracking** (`tracker`): FIFO queue of in-flight request tags
//! 3. **Signal** (`signal`): watch-backed shared last-operation-state cell
//! 4. **Executors** (`single`, `stream`): the dispatch entry points
//! 5. **Scope** (`scope`): cancellable launched units of work

pub mod classify;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod scope;
pub mod signal;
pub mod single;
pub mod stream;
pub mod tracker;

// Re-export key types for convenient access.
pub use config::OrchestratorConfig;
pub use error::DispatchError;
pub use orchestrator::StateOrchestrator;
pub use scope::{HostScope, LaunchHandle};
pub use signal::{SharedState, StatePayload, StateSignal};
pub use single::LoadableSignal;
pub use stream::OperationSignal;
pub use tracker::{RequestTag, RequestTracker};
