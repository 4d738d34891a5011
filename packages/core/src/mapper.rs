//! Mapper collaborator traits: raw call results into canonical states.
//!
//! The raw result type itself declares its mapping, so the payload type a
//! success hook receives is fixed at compile time by the same impl that
//! produces it. Implementations must be total and deterministic: every
//! value maps to exactly one variant, and mapping the same value twice
//! yields the same variant. Failure outcomes must already be encoded in
//! the raw value; a panicking mapper is a collaborator defect and
//! propagates uncaught through the launched unit of work.

use crate::error::ErrorDetail;
use crate::loadable::Loadable;
use crate::state::OperationState;

/// Maps a raw call result into the canonical operation state.
pub trait MapOutcome {
    /// Payload carried by mapped `Success` states.
    type Payload;

    /// The canonical state for this raw result.
    fn to_state(&self) -> OperationState<Self::Payload>;
}

/// Identity mapping for calls that already produce an operation state.
impl<T: Clone> MapOutcome for OperationState<T> {
    type Payload = T;

    fn to_state(&self) -> OperationState<T> {
        self.clone()
    }
}

/// Canonical REST-shaped mapping: present payload, absent payload, failure.
impl<T, E> MapOutcome for Result<Option<T>, E>
where
    T: Clone,
    E: std::fmt::Display,
{
    type Payload = T;

    fn to_state(&self) -> OperationState<T> {
        match self {
            Ok(Some(value)) => OperationState::Success(value.clone()),
            Ok(None) => OperationState::NoContent,
            Err(err) => OperationState::Error(ErrorDetail::from_display(err)),
        }
    }
}

/// Maps a raw call result into a loadable value for the simple pathway.
pub trait MapLoadable {
    /// Payload carried by mapped `Success` values.
    type Payload;

    /// The canonical loadable value for this raw result.
    fn to_loadable(&self) -> Loadable<Self::Payload>;
}

/// Identity mapping for calls that already produce a loadable.
impl<T: Clone> MapLoadable for Loadable<T> {
    type Payload = T;

    fn to_loadable(&self) -> Loadable<T> {
        self.clone()
    }
}

/// A plain fallible call: success carries the payload, failure the detail.
impl<T, E> MapLoadable for Result<T, E>
where
    T: Clone,
    E: std::fmt::Display,
{
    type Payload = T;

    fn to_loadable(&self) -> Loadable<T> {
        match self {
            Ok(value) => Loadable::Success(value.clone()),
            Err(err) => Loadable::Error(ErrorDetail::from_display(err)),
        }
    }
}
