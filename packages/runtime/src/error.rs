//! Dispatch-time error taxonomy.
//!
//! Every variant is a caller or collaborator defect detected synchronously
//! at the entry point, never a business failure: those travel through the
//! mapper as error states. All variants except `StateResetForbidden` are
//! raised before any state mutation; `StateResetForbidden` mutates only on
//! success. Nothing here is retried.

/// Errors raised synchronously by the dispatch entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The declared result shape does not fit the chosen entry point.
    #[error("invalid declared result shape: expected {expected}, found {found}")]
    InvalidArgument {
        /// What the entry point accepts.
        expected: &'static str,
        /// Stringified type of the offending declaration.
        found: &'static str,
        /// Routing hint naming the entry point that accepts the found shape.
        hint: Option<&'static str>,
    },

    /// A single-value declaration whose type is not an operation-state type.
    #[error("no operation-state type found in declared result: {found}")]
    NoOperationStateFound {
        /// Stringified type of the offending declaration.
        found: &'static str,
        /// Routing hint, when the shape fits another pathway.
        hint: Option<&'static str>,
    },

    /// A stream declaration whose element type is not an operation-state type.
    #[error("no stream of operation-state found in declared result: {found}")]
    NoStreamOfOperationStateFound {
        /// Stringified type of the offending declaration.
        found: &'static str,
        /// Routing hint, when the shape fits another pathway.
        hint: Option<&'static str>,
    },

    /// The declaration is the unit type, so auto-mapping is impossible.
    #[error("cannot auto-map an operation that declares no result value ({found})")]
    WrongGenericsAutoCast {
        /// Stringified unit declaration.
        found: &'static str,
    },

    /// A reset was attempted outside its precondition variant.
    #[error("state reset forbidden: expected the {expected} state, found {found}")]
    StateResetForbidden {
        /// Variant the reset requires.
        expected: &'static str,
        /// Variant actually published.
        found: &'static str,
    },

    /// The host scope was torn down before the launched work completed.
    #[error("host scope shut down before the operation completed")]
    ScopeShutDown,
}
