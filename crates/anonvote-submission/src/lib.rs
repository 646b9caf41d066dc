//! # anonvote-submission — Eligibility-Gated Anonymous Submission
//!
//! identity proof ─▶ profile ─▶ inclusion proof ─▶ verifier arguments ─▶
//! one chain call ─▶ session ledger.
//!
//! - **prepare** (`prepare.rs`): pure checks and argument assembly.
//! - **SubmissionCoordinator** (`coordinator.rs`): single-flight
//!   submit → confirm → record for votes and comments.
//! - **SessionDriver** (`driver.rs`): wallet connection, login, and
//!   account-change handling.

pub mod coordinator;
pub mod driver;
pub mod error;
pub mod prepare;

pub use coordinator::{SubmissionCoordinator, DEFAULT_VOTE_OPTION};
pub use driver::SessionDriver;
pub use error::{DriverError, SubmissionError};
pub use prepare::{prepare_comment, prepare_vote};
