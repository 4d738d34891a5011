//! `opstate` Core — operation-state model, shape descriptors, and mapper traits.

pub mod envelope;
pub mod error;
pub mod loadable;
pub mod mapper;
pub mod shape;
pub mod state;

pub use envelope::Streamed;
pub use error::ErrorDetail;
pub use loadable::Loadable;
pub use mapper::{MapLoadable, MapOutcome};
pub use shape::{ShapeDescriptor, ShapeKind};
pub use state::{OperationKind, OperationState};
