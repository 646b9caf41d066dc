//! # anonvote-cli — Command-Line Interface
//!
//! ## Subcommands
//!
//! - `root`: Merkle roots of the eligibility list
//! - `prove`: inclusion proof for a region and pincode
//! - `login`: obtain an identity proof and print the revealed profile
//! - `proof show`: dump the raw identity proof
//! - `vote`: eligibility-gated vote
//! - `comment`: post a comment
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers delegate to the domain
//!   crates and contain no pipeline logic.
//! - Handlers return `anyhow::Result`; `exit.rs` maps the underlying error
//!   category to the process exit code.

pub mod app;
pub mod eligibility;
pub mod exit;
pub mod identity;
pub mod logging;
pub mod submit;
