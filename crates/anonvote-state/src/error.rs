//! Session gate errors.

use thiserror::Error;

use anonvote_core::ErrorCategory;

use crate::session::{ConnectionState, ProofStatus, SubmissionKind};

/// Why a submission could not start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The session is not `(Connected, Verified)`.
    #[error("session not ready to submit (connection: {connection}, proof: {proof_status})")]
    NotReady {
        connection: ConnectionState,
        proof_status: ProofStatus,
    },

    /// Another submission is still in flight.
    #[error("a {in_flight} submission is already in progress")]
    SubmissionInProgress { in_flight: SubmissionKind },
}

impl GateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotReady { .. } => ErrorCategory::Submission,
            Self::SubmissionInProgress { .. } => ErrorCategory::Concurrency,
        }
    }
}
