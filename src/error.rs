//! Error handling for the interaction subsystem
//!
//! Only internal consistency violations surface as errors. Cache pressure is
//! reported through `bool`/`Option` returns and geometric degeneracy is logged
//! and patched with a fallback, so neither ever shows up here.

use crate::entity::EntityHandle;
use crate::interaction::InteractionId;
use crate::light::LightHandle;

/// Main error type for the interaction graph
#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    #[error("light def {0:?} does not exist")]
    MissingLightDef(LightHandle),

    #[error("entity def {0:?} does not exist")]
    MissingEntityDef(EntityHandle),

    #[error("interaction {0:?} is stale or was never allocated")]
    StaleInteraction(InteractionId),

    #[error("interaction table entry [{light}][{entity}] is already occupied")]
    TableCellOccupied { light: u32, entity: u32 },

    #[error("interaction table entry [{light}][{entity}] does not reference {id:?}")]
    TableCellMismatch {
        light: u32,
        entity: u32,
        id: InteractionId,
    },

    #[error("light polytope has {count} vertices (max {max})")]
    TooManyLightVerts { count: usize, max: usize },

    #[error("invalid handle: {0}")]
    InvalidHandle(String),
}

impl InteractionError {
    /// True for errors that mean the graph invariants were broken by a caller.
    /// These are never expected at runtime and must not be retried.
    pub fn is_consistency_violation(&self) -> bool {
        matches!(
            self,
            InteractionError::TableCellOccupied { .. }
                | InteractionError::TableCellMismatch { .. }
                | InteractionError::StaleInteraction(_)
                | InteractionError::TooManyLightVerts { .. }
        )
    }
}

/// Type alias for Results in the interaction subsystem
pub type InteractionResult<T> = Result<T, InteractionError>;

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_interaction<F>(self, f: F) -> InteractionResult<T>
    where
        F: FnOnce() -> InteractionError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_interaction<F>(self, f: F) -> InteractionResult<T>
    where
        F: FnOnce() -> InteractionError,
    {
        self.ok_or_else(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InteractionError::TableCellOccupied {
            light: 3,
            entity: 7,
        };
        assert_eq!(
            err.to_string(),
            "interaction table entry [3][7] is already occupied"
        );
    }

    #[test]
    fn test_consistency_classification() {
        assert!(InteractionError::TableCellOccupied {
            light: 0,
            entity: 0
        }
        .is_consistency_violation());
        assert!(!InteractionError::MissingLightDef(LightHandle(4)).is_consistency_violation());
    }

    #[test]
    fn test_option_ext() {
        let opt: Option<i32> = None;
        let result = opt.ok_or_interaction(|| InteractionError::MissingEntityDef(EntityHandle(2)));
        assert!(matches!(
            result,
            Err(InteractionError::MissingEntityDef(EntityHandle(2)))
        ));
    }
}
