//! # anonvote-core — Foundational Types
//!
//! The leaf of the anonvote crate graph. Every other crate depends on
//! `anonvote-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Region`, `Pincode`,
//!    `Bytes32`, `NullifierHash`, `TxHash`, `AccountAddress` all have
//!    validated constructors. No bare strings or byte slices cross crate
//!    boundaries for identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** Content digests (e.g. the cache key of an
//!    eligibility list) are computed only over JCS-canonical bytes.
//!
//! 3. **One error taxonomy.** `ErrorCategory` classifies every failure in the
//!    workspace so that callers can decide whether it blocks the session or
//!    only the current attempt.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `anonvote-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, ErrorCategory, IdentifierError};
pub use identity::{AccountAddress, Bytes32, NullifierHash, Pincode, Region, TxHash};
