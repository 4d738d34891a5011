//! Caller-supplied declarations of a call's result shape.
//!
//! The dispatch entry points never inspect a call at runtime; the caller
//! hands over a [`ShapeDescriptor`] built from the canonical state type the
//! raw result maps into, and the classifier validates it before the call
//! executes. The descriptor's stringified type name doubles as the
//! outstanding-request tag.

use std::any::type_name;

use crate::loadable::Loadable;
use crate::state::OperationState;

/// Discriminant for a call's declared result shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// A single operation-state value.
    State,
    /// A stream whose items map into operation-state values.
    StateStream,
    /// A single loadable value for the simple pathway.
    Loadable,
    /// The unit type: the call declares no usable result.
    Unit,
    /// A raw value with no recognized shape.
    Opaque,
}

/// Declared result shape of one call.
///
/// `type_name` names the canonical state type of the declaration (the
/// element type, for streams) and serves as the request tag registered
/// with the tracker while the operation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeDescriptor {
    kind: ShapeKind,
    type_name: &'static str,
}

impl ShapeDescriptor {
    /// A call producing one `OperationState<T>`-mapped result.
    #[must_use]
    pub fn state_of<T>() -> Self {
        Self {
            kind: ShapeKind::State,
            type_name: type_name::<OperationState<T>>(),
        }
    }

    /// A call producing a stream of `OperationState<T>`-mapped items.
    #[must_use]
    pub fn stream_of<T>() -> Self {
        Self {
            kind: ShapeKind::StateStream,
            type_name: type_name::<OperationState<T>>(),
        }
    }

    /// A call producing one `Loadable<T>`-mapped result.
    #[must_use]
    pub fn loadable_of<T>() -> Self {
        Self {
            kind: ShapeKind::Loadable,
            type_name: type_name::<Loadable<T>>(),
        }
    }

    /// A call that declares no result value.
    #[must_use]
    pub fn unit() -> Self {
        Self {
            kind: ShapeKind::Unit,
            type_name: type_name::<()>(),
        }
    }

    /// A raw declaration the engine cannot auto-map.
    #[must_use]
    pub fn opaque<R>() -> Self {
        Self {
            kind: ShapeKind::Opaque,
            type_name: type_name::<R>(),
        }
    }

    /// The declared shape discriminant.
    #[must_use]
    pub const fn kind(self) -> ShapeKind {
        self.kind
    }

    /// Stringified canonical type of the declaration.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        self.type_name
    }

    /// Tag registered with the outstanding-request tracker.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        self.type_name
    }
}
