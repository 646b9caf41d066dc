//! Eligibility error types.
//!
//! `NotEligible` is an expected outcome, not a fault: it is returned as the
//! `Err` side of [`crate::EligibilityIndex::prove_inclusion`] and carries the
//! valid codes so the caller can explain the refusal.

use std::path::PathBuf;

use thiserror::Error;

use anonvote_core::{ErrorCategory, Pincode, Region};

/// Errors loading or querying eligibility configuration.
#[derive(Debug, Error)]
pub enum EligibilityError {
    /// The region is not present in the eligibility list.
    #[error("unknown region {region}")]
    UnknownRegion { region: String },

    /// The eligibility file could not be read.
    #[error("failed to read eligibility list at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML eligibility list at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON eligibility list at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A region or code in the file was empty.
    #[error("invalid entry in eligibility list: {0}")]
    InvalidEntry(#[from] anonvote_core::IdentifierError),

    /// A region was listed with no codes.
    #[error("region {region} has no eligible codes")]
    EmptyRegion { region: Region },
}

impl EligibilityError {
    /// Loading failures are deployment problems; lookups are eligibility
    /// outcomes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownRegion { .. } => ErrorCategory::Eligibility,
            _ => ErrorCategory::Configuration,
        }
    }
}

/// Why a `(region, code)` pair has no inclusion proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotEligibleReason {
    /// The region is not configured.
    UnknownRegion,
    /// The region exists but does not list the code.
    NotListed,
}

/// `code` is not a member of `EligibilityList[region]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pincode {pincode} is not eligible in region {region}")]
pub struct NotEligible {
    pub region: String,
    pub pincode: String,
    pub reason: NotEligibleReason,
    /// The codes that are eligible in `region` (empty for unknown regions).
    pub valid_codes: Vec<Pincode>,
}

impl NotEligible {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Eligibility
    }
}
