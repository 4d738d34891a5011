//! The operation-state model: the shared tagged union published to observers.

use serde::Serialize;

use crate::error::ErrorDetail;

/// Caller-supplied label for an in-flight operation.
///
/// Opaque to the engine: it is carried through [`OperationState::Loading`]
/// for telemetry and UI hints only and never participates in dispatch
/// decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OperationKind(&'static str);

impl OperationKind {
    /// Label used when the engine forces the shared signal back to loading
    /// because other requests are still outstanding, so no single caller
    /// tag applies.
    pub const UNSPECIFIED: Self = Self("unspecified");

    /// Creates a kind from a static label.
    #[must_use]
    pub const fn new(label: &'static str) -> Self {
        Self(label)
    }

    /// The label this kind was created with.
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.0
    }
}

/// State of the last operation, published to observers as a single value.
///
/// Tagged union with exactly one active variant at a time. Construction and
/// variant inspection are the whole surface; none of the methods panic.
///
/// `Serialize` is derived for telemetry snapshots. `Deserialize` is
/// intentionally absent: states are process-local values, never wire data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OperationState<T> {
    /// No operation has run yet, or the state was explicitly cleared.
    Idle,
    /// An operation is in flight.
    Loading(OperationKind),
    /// The operation completed and produced a payload.
    Success(T),
    /// The operation completed successfully with no payload (a "204"-style
    /// outcome, distinct from error).
    NoContent,
    /// The operation failed.
    Error(ErrorDetail),
}

impl<T> OperationState<T> {
    /// True for `Idle`.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// True for `Loading`.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    /// True for `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True for `NoContent`.
    #[must_use]
    pub const fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    /// True for `Error`.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// True for any reportable result: `Success`, `NoContent`, or `Error`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::NoContent | Self::Error(_))
    }

    /// Name of the active variant, for diagnostics and error messages.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading(_) => "Loading",
            Self::Success(_) => "Success",
            Self::NoContent => "NoContent",
            Self::Error(_) => "Error",
        }
    }

    /// The kind attached to a `Loading` state.
    #[must_use]
    pub const fn loading_kind(&self) -> Option<OperationKind> {
        match self {
            Self::Loading(kind) => Some(*kind),
            _ => None,
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

    /// Transforms the success payload, preserving every other variant.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationState<U> {
        match self {
            Self::Idle => OperationState::Idle,
            Self::Loading(kind) => OperationState::Loading(kind),
            Self::Success(data) => OperationState::Success(f(data)),
            Self::NoContent => OperationState::NoContent,
            Self::Error(detail) => OperationState::Error(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_predicates() {
        assert!(OperationState::<i32>::Idle.is_idle());
        assert!(OperationState::<i32>::Loading(OperationKind::new("fetch")).is_loading());
        assert!(OperationState::Success(7).is_success());
        assert!(OperationState::<i32>::NoContent.is_no_content());
        assert!(OperationState::<i32>::Error(ErrorDetail::new("boom")).is_error());
    }

    #[test]
    fn terminal_covers_success_no_content_and_error() {
        assert!(OperationState::Success(1).is_terminal());
        assert!(OperationState::<i32>::NoContent.is_terminal());
        assert!(OperationState::<i32>::Error(ErrorDetail::new("boom")).is_terminal());
        assert!(!OperationState::<i32>::Idle.is_terminal());
        assert!(!OperationState::<i32>::Loading(OperationKind::UNSPECIFIED).is_terminal());
    }

    #[test]
    fn variant_names() {
        assert_eq!(OperationState::<i32>::Idle.variant_name(), "Idle");
        assert_eq!(
            OperationState::<i32>::Loading(OperationKind::UNSPECIFIED).variant_name(),
            "Loading"
        );
        assert_eq!(OperationState::Success(1).variant_name(), "Success");
        assert_eq!(OperationState::<i32>::NoContent.variant_name(), "NoContent");
        assert_eq!(
            OperationState::<i32>::Error(ErrorDetail::new("boom")).variant_name(),
            "Error"
        );
    }

    #[test]
    fn loading_kind_is_carried_through() {
        let kind = OperationKind::new("refresh");
        let state = OperationState::<i32>::Loading(kind);
        assert_eq!(state.loading_kind(), Some(kind));
        assert_eq!(OperationState::Success(1).loading_kind(), None);
    }

    #[test]
    fn map_transforms_only_the_payload() {
        let doubled = OperationState::Success(21).map(|n| n * 2);
        assert_eq!(doubled, OperationState::Success(42));

        let kind = OperationKind::new("fetch");
        assert_eq!(
            OperationState::<i32>::Loading(kind).map(|n| n * 2),
            OperationState::Loading(kind)
        );
        assert_eq!(
            OperationState::<i32>::NoContent.map(|n| n * 2),
            OperationState::NoContent
        );

        let detail = ErrorDetail::new("boom");
        assert_eq!(
            OperationState::<i32>::Error(detail.clone()).map(|n| n * 2),
            OperationState::Error(detail)
        );
    }

    #[test]
    fn accessors_return_payload_and_detail() {
        assert_eq!(OperationState::Success(9).success(), Some(&9));
        assert_eq!(OperationState::<i32>::NoContent.success(), None);

        let detail = ErrorDetail::with_status(503, "unavailable");
        let state = OperationState::<i32>::Error(detail.clone());
        assert_eq!(state.error_detail(), Some(&detail));
    }

    #[test]
    fn serializes_for_telemetry() {
        let json = serde_json::to_string(&OperationState::Success(3)).unwrap();
        assert_eq!(json, r#"{"Success":3}"#);

        let json =
            serde_json::to_string(&OperationState::<i32>::Loading(OperationKind::new("fetch")))
                .unwrap();
        assert_eq!(json, r#"{"Loading":"fetch"}"#);
    }
}
