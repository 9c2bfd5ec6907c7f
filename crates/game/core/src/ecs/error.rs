//! Entity store errors.

use crate::error::{ErrorSeverity, GameError};

use super::{ComponentMask, DomainType, EntityId};

/// Errors raised by [`EntityStore`](super::EntityStore) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Write to an id that has not been created.
    #[error("entity {id} out of bounds (entities: {len})")]
    OutOfBounds { id: EntityId, len: usize },

    /// The entity's mask matches no registered type.
    #[error("entity {id} has component mask {mask:?} which matches no registered type")]
    TypeResolution { id: EntityId, mask: ComponentMask },

    /// Association requested for a type the registry does not know.
    #[error("type {0} is not registered")]
    UnregisteredType(DomainType),

    /// The entity resolved to a different type than the caller asked for.
    #[error("entity {id} is a {found}, expected {expected}")]
    TypeMismatch {
        id: EntityId,
        expected: DomainType,
        found: DomainType,
    },

    /// Associated data was not a JSON object.
    #[error("data associated with entity {id} must be an object")]
    NotAnObject { id: EntityId },

    /// Stored components could not be converted to or from a typed view.
    #[error("entity {id} could not be converted as {ty}: {message}")]
    Conversion {
        id: EntityId,
        ty: DomainType,
        message: String,
    },
}

impl GameError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        use StoreError::*;
        match self {
            OutOfBounds { .. } | TypeMismatch { .. } | NotAnObject { .. } | Conversion { .. } => {
                ErrorSeverity::Validation
            }

            // Registry and stored data disagree
            TypeResolution { .. } | UnregisteredType(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StoreError::*;
        match self {
            OutOfBounds { .. } => "STORE_OUT_OF_BOUNDS",
            TypeResolution { .. } => "STORE_TYPE_RESOLUTION",
            UnregisteredType(_) => "STORE_UNREGISTERED_TYPE",
            TypeMismatch { .. } => "STORE_TYPE_MISMATCH",
            NotAnObject { .. } => "STORE_NOT_AN_OBJECT",
            Conversion { .. } => "STORE_CONVERSION",
        }
    }
}
