//! # anonvote-state — Session State Machine
//!
//! - **Session** (`session.rs`): the per-client aggregate, its events, and
//!   the pure transition function.
//! - **SessionMachine** (`machine.rs`): serialized event application,
//!   readiness gate, and single-flight submission tickets.
//!
//! Connection (`Disconnected → Connecting → Connected`) and proof status
//! (`Unverified → Verified`) are orthogonal; only `(Connected, Verified)`
//! may submit.

pub mod error;
pub mod machine;
pub mod session;

pub use error::GateError;
pub use machine::{SessionMachine, SubmissionTicket};
pub use session::{
    ConnectionState, ProofStatus, Session, SessionEvent, SubmissionKind, SubmissionPayload,
    SubmissionRecord,
};
