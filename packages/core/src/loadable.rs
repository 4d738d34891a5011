//! Narrow loading/success/error union for the fire-and-forget pathway.

use serde::Serialize;

use crate::error::ErrorDetail;

/// Value of a simple load that bypasses the outstanding-request tracker.
///
/// Unlike [`OperationState`](crate::OperationState) there is no idle or
/// no-content variant: a loadable is born loading and settles to exactly
/// one of success or error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Loadable<T> {
    /// The load has not settled yet.
    Loading,
    /// The load completed with a value.
    Success(T),
    /// The load failed.
    Error(ErrorDetail),
}

impl<T> Loadable<T> {
    /// True for `Loading`.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True for `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True for `Error`.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Name of the active variant, for diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Success(_) => "Success",
            Self::Error(_) => "Error",
        }
    }

    /// The success payload, if any.
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The failure detail, if any.
    #[must_use]
    pub const fn error_detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Error(detail) => Some(detail),
            _ => None,
        }
    }

    /// Transforms the success payload, preserving the other variants.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Self::Loading => Loadable::Loading,
            Self::Success(data) => Loadable::Success(f(data)),
            Self::Error(detail) => Loadable::Error(detail),
        }
    }
}
