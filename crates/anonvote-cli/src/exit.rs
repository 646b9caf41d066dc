//! Exit codes by error category.

use anonvote_chain::{ChainError, ConfigError};
use anonvote_core::ErrorCategory;
use anonvote_eligibility::{EligibilityError, NotEligible};
use anonvote_submission::{DriverError, SubmissionError};
use anonvote_zkp::ProofError;

/// Exit code for unclassified failures.
pub const EXIT_FAILURE: i32 = 1;

/// The category of the first classified error in the chain.
pub fn category_of(err: &anyhow::Error) -> Option<ErrorCategory> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<SubmissionError>() {
            Some(e.category())
        } else if let Some(e) = cause.downcast_ref::<DriverError>() {
            Some(e.category())
        } else if let Some(e) = cause.downcast_ref::<ChainError>() {
            Some(e.category())
        } else if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.category())
        } else if let Some(e) = cause.downcast_ref::<ProofError>() {
            Some(e.category())
        } else if let Some(e) = cause.downcast_ref::<EligibilityError>() {
            Some(e.category())
        } else {
            cause.downcast_ref::<NotEligible>().map(NotEligible::category)
        }
    })
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    category_of(err).map_or(EXIT_FAILURE, |c| c.exit_code())
}
