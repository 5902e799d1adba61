//! Relay error types.

use thiserror::Error;

use super::conversation::DeliveryError;
use crate::generator::GenerationError;

/// Why a generate-and-deliver round did not complete.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("failed to handle website file: {0}")]
    Artifact(#[from] std::io::Error),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl RelayError {
    /// The generation service answered, but refused.
    pub fn rejected_status(&self) -> Option<u16> {
        match self {
            RelayError::Generation(GenerationError::Rejected { status }) => Some(*status),
            _ => None,
        }
    }
}
