//! # Error Types — Shared Taxonomy
//!
//! Every crate in the workspace defines its own `thiserror` enum and maps
//! each variant onto an [`ErrorCategory`]. The category decides propagation:
//!
//! - `Configuration` and `Connectivity` block the whole session and are
//!   surfaced at the top level.
//! - `Proof`, `Eligibility`, `Submission` and `Concurrency` are local to one
//!   submission attempt; the session stays usable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of every failure the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing or invalid deployment configuration (fatal).
    Configuration,
    /// No wallet provider, connection rejected, or no authorized account.
    Connectivity,
    /// Identity proof missing required revealed fields or malformed.
    Proof,
    /// Pincode is not a member of the claimed region's list.
    Eligibility,
    /// The chain rejected or reverted the transaction, or the session was
    /// not ready to submit.
    Submission,
    /// A submission was attempted while another was in flight.
    Concurrency,
}

impl ErrorCategory {
    /// Whether errors of this category block every other operation.
    pub fn blocks_session(&self) -> bool {
        matches!(self, Self::Configuration | Self::Connectivity)
    }

    /// Process exit code used by the CLI for this category.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration => 2,
            Self::Connectivity => 3,
            Self::Proof => 4,
            Self::Eligibility => 5,
            Self::Submission => 6,
            Self::Concurrency => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Connectivity => "connectivity",
            Self::Proof => "proof",
            Self::Eligibility => "eligibility",
            Self::Submission => "submission",
            Self::Concurrency => "concurrency",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error parsing a domain identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The value was empty after trimming.
    #[error("{kind} must not be empty")]
    Empty {
        /// Identifier kind, e.g. `"region"`.
        kind: &'static str,
    },

    /// The value was not valid hex of the expected length.
    #[error("invalid {kind}: expected {expected} hex chars, got {actual:?}")]
    InvalidHex {
        /// Identifier kind, e.g. `"address"`.
        kind: &'static str,
        /// Expected number of hex characters (without `0x`).
        expected: usize,
        /// The rejected input.
        actual: String,
    },
}
