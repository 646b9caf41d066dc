//! Submission errors.

use thiserror::Error;

use anonvote_chain::ChainError;
use anonvote_core::{ErrorCategory, TxHash};
use anonvote_state::{ConnectionState, GateError, ProofStatus, SubmissionKind};
use anonvote_zkp::ProofError;

/// Every way a vote or comment submission can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("session not ready to submit (connection: {connection}, proof: {proof_status})")]
    NotReady {
        connection: ConnectionState,
        proof_status: ProofStatus,
    },

    #[error("a {in_flight} submission is already in progress")]
    SubmissionInProgress { in_flight: SubmissionKind },

    /// The profile lacks the claims eligibility is checked against.
    #[error("profile is missing eligibility field `{field}`; log in again revealing state and pincode")]
    MissingEligibilityFields { field: &'static str },

    #[error("pincode {pincode} is not eligible in {region}")]
    IneligiblePincode {
        pincode: String,
        region: String,
        valid_codes: Vec<String>,
    },

    #[error("vote option must be at least 1, got {option}")]
    InvalidVoteOption { option: u64 },

    #[error("comment is empty")]
    EmptyComment,

    #[error(transparent)]
    Proof(#[from] ProofError),

    /// The chain refused or reverted the transaction.
    #[error("submission rejected: {reason}")]
    SubmissionRejected { reason: String },

    #[error("transaction {tx_hash} was sent but not confirmed in time")]
    Unconfirmed { tx_hash: TxHash },
}

impl SubmissionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SubmissionInProgress { .. } => ErrorCategory::Concurrency,
            Self::MissingEligibilityFields { .. } | Self::Proof(_) => ErrorCategory::Proof,
            Self::IneligiblePincode { .. } => ErrorCategory::Eligibility,
            Self::NotReady { .. }
            | Self::InvalidVoteOption { .. }
            | Self::EmptyComment
            | Self::SubmissionRejected { .. }
            | Self::Unconfirmed { .. } => ErrorCategory::Submission,
        }
    }
}

impl From<GateError> for SubmissionError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::NotReady {
                connection,
                proof_status,
            } => Self::NotReady {
                connection,
                proof_status,
            },
            GateError::SubmissionInProgress { in_flight } => {
                Self::SubmissionInProgress { in_flight }
            }
        }
    }
}

impl From<ChainError> for SubmissionError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Unconfirmed { tx_hash } => Self::Unconfirmed { tx_hash },
            other => Self::SubmissionRejected {
                reason: other.reason(),
            },
        }
    }
}

/// Failures of session-level operations: connecting, logging in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Proof(#[from] ProofError),
}

impl DriverError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Chain(e) => e.category(),
            Self::Proof(e) => e.category(),
        }
    }
}
