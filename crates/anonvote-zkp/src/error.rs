//! Proof-handling errors.

use thiserror::Error;

use anonvote_core::ErrorCategory;

/// Errors decoding, validating, or obtaining an identity proof.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The raw proof does not match the expected tagged shape.
    #[error("invalid identity proof: {reason}")]
    Invalid { reason: String },

    /// A claim required for submission was not revealed. The user must log
    /// in again with a larger reveal set.
    #[error("identity proof does not reveal required claim `{claim}`")]
    MissingClaim { claim: &'static str },

    /// The proof provider failed.
    #[error("identity proof provider error: {0}")]
    Provider(String),
}

impl ProofError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Proof
    }
}
