//! Common error infrastructure for board-core.
//!
//! Each subsystem defines its own error enum next to the code that raises it
//! (`StoreError`, `SelectorError`, `DispatchError`, `ScriptError`,
//! `BoardError`). This module provides the shared classification used to
//! decide how a caller should react to any of them.
//!
//! # Design Principles
//!
//! - **Type Safety**: each subsystem has its own error type with specific variants
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Stable Codes**: every variant maps to a static code for logs and tests

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the operation may succeed later or with other input
/// - **Validation**: invalid input (bad script, bad board, bad reference)
/// - **Internal**: inconsistent runtime state, e.g. a runaway event chain
/// - **Fatal**: the component registry or stored data is inconsistent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with the same or an alternative action.
    ///
    /// Examples: game not started yet, no players joined
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: malformed selector, unknown script keyword, tile count mismatch
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: event chain exceeded its depth bound
    Internal,

    /// Fatal error - stored data no longer matches the registry.
    ///
    /// Examples: an entity mask that resolves to no registered type
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all board-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
