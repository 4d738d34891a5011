//! Result-shape classification: `ShapeDescriptor` -> pathway validation.
//!
//! Runs before the call executes and before any state mutation, so a
//! rejected declaration leaves the shared signal and the tracker untouched.

use opstate_core::{ShapeDescriptor, ShapeKind};
use tracing::warn;

use crate::error::DispatchError;

/// Shape accepted by the single-shot operation pathway.
const SINGLE_EXPECTED: &str = "a single operation-state value";
/// Shape accepted by the streaming operation pathway.
const STREAM_EXPECTED: &str = "a stream of operation-state values";
/// Shape accepted by the loadable pathway.
const LOADABLE_EXPECTED: &str = "a single loadable value";

/// Validates a declaration for the single-shot operation pathway.
///
/// # Errors
///
/// - `WrongGenericsAutoCast` for the unit shape: a call that declares no
///   result cannot be auto-mapped.
/// - `InvalidArgument` with a routing hint for stream shapes.
/// - `NoOperationStateFound` for loadable shapes (with a routing hint) and
///   for opaque declarations.
pub fn require_single_state(shape: ShapeDescriptor) -> Result<(), DispatchError> {
    match shape.kind() {
        ShapeKind::State => Ok(()),
        ShapeKind::Unit => reject(DispatchError::WrongGenericsAutoCast {
            found: shape.type_name(),
        }),
        ShapeKind::StateStream => reject(DispatchError::InvalidArgument {
            expected: SINGLE_EXPECTED,
            found: shape.type_name(),
            hint: Some("this declaration is a stream; use the streaming entry points"),
        }),
        ShapeKind::Loadable => reject(DispatchError::NoOperationStateFound {
            found: shape.type_name(),
            hint: Some("loadable declarations go through the loadable pathway"),
        }),
        ShapeKind::Opaque => reject(DispatchError::NoOperationStateFound {
            found: shape.type_name(),
            hint: None,
        }),
    }
}

/// Validates a declaration for the streaming operation pathway.
///
/// # Errors
///
/// - `WrongGenericsAutoCast` for the unit shape.
/// - `InvalidArgument` with a routing hint for single-state shapes.
/// - `NoStreamOfOperationStateFound` for loadable shapes (with a routing
///   hint) and for opaque declarations.
pub fn require_state_stream(shape: ShapeDescriptor) -> Result<(), DispatchError> {
    match shape.kind() {
        ShapeKind::StateStream => Ok(()),
        ShapeKind::Unit => reject(DispatchError::WrongGenericsAutoCast {
            found: shape.type_name(),
        }),
        ShapeKind::State => reject(DispatchError::InvalidArgument {
            expected: STREAM_EXPECTED,
            found: shape.type_name(),
            hint: Some("this declaration is a single state; use the single-shot entry points"),
        }),
        ShapeKind::Loadable => reject(DispatchError::NoStreamOfOperationStateFound {
            found: shape.type_name(),
            hint: Some("loadable declarations go through the loadable pathway"),
        }),
        ShapeKind::Opaque => reject(DispatchError::NoStreamOfOperationStateFound {
            found: shape.type_name(),
            hint: None,
        }),
    }
}

/// Validates a declaration for the loadable pathway.
///
/// # Errors
///
/// - `WrongGenericsAutoCast` for the unit shape.
/// - `InvalidArgument` for every other non-loadable shape, with routing
///   hints for the shapes that fit an operation pathway.
pub fn require_loadable(shape: ShapeDescriptor) -> Result<(), DispatchError> {
    match shape.kind() {
        ShapeKind::Loadable => Ok(()),
        ShapeKind::Unit => reject(DispatchError::WrongGenericsAutoCast {
            found: shape.type_name(),
        }),
        ShapeKind::State => reject(DispatchError::InvalidArgument {
            expected: LOADABLE_EXPECTED,
            found: shape.type_name(),
            hint: Some("operation-state declarations go through the single-shot entry points"),
        }),
        ShapeKind::StateStream => reject(DispatchError::InvalidArgument {
            expected: LOADABLE_EXPECTED,
            found: shape.type_name(),
            hint: Some("this declaration is a stream; use the streaming entry points"),
        }),
        ShapeKind::Opaque => reject(DispatchError::InvalidArgument {
            expected: LOADABLE_EXPECTED,
            found: shape.type_name(),
            hint: None,
        }),
    }
}

fn reject(err: DispatchError) -> Result<(), DispatchError> {
    warn!(error = %err, "declared result shape rejected");
    Err(err)
}
