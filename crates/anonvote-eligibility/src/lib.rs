//! # anonvote-eligibility — Region Eligibility
//!
//! - **EligibilityList** (`list.rs`): static region → location-code
//!   configuration, loaded once from YAML/JSON or the built-in sample.
//! - **EligibilityIndex** (`index.rs`): per-region sorted-pair Merkle trees
//!   with inclusion proofs, cached by content digest.
//!
//! A miss is reported as [`NotEligible`], an ordinary outcome carrying the
//! valid codes, never as a fault and never silently bypassed.

pub mod error;
pub mod index;
pub mod list;

pub use error::{EligibilityError, NotEligible, NotEligibleReason};
pub use index::EligibilityIndex;
pub use list::EligibilityList;
