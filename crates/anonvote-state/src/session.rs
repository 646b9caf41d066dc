//! # Session and Transitions
//!
//! [`Session`] is the single mutable aggregate of one client. It is only
//! ever changed by [`Session::apply`], a pure `(Session, SessionEvent) ->
//! Session` function.
//!
//! ## States
//!
//! ```text
//! Disconnected ──connect──▶ Connecting ──ok──▶ Connected
//!       ▲                       │                  │
//!       └────────fail───────────┘                  │
//!       └──────────────zero accounts───────────────┘
//!
//! Unverified ──proof accepted──▶ Verified   (orthogonal)
//! ```
//!
//! Only `(Connected, Verified)` admits a submission.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use anonvote_chain::ContractBinding;
use anonvote_core::{AccountAddress, TxHash};
use anonvote_zkp::{DisplayFields, IdentityProof, RevealedProfile};

use crate::error::GateError;

// ─── State enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofStatus {
    #[default]
    Unverified,
    Verified,
}

impl std::fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Unverified => "unverified",
            Self::Verified => "verified",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Vote,
    Comment,
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Vote => "vote",
            Self::Comment => "comment",
        })
    }
}

// ─── Submission ledger ───────────────────────────────────────────────

/// What was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionPayload {
    Vote { option: u64 },
    Comment { text: String },
}

impl SubmissionPayload {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            Self::Vote { .. } => SubmissionKind::Vote,
            Self::Comment { .. } => SubmissionKind::Comment,
        }
    }
}

/// A confirmed submission. Created only after on-chain confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub payload: SubmissionPayload,
    pub tx_hash: TxHash,
    pub confirmed_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(payload: SubmissionPayload, tx_hash: TxHash) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            tx_hash,
            confirmed_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> SubmissionKind {
        self.payload.kind()
    }
}

// ─── Events ──────────────────────────────────────────────────────────

/// Everything that can change a session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The user asked to connect a wallet.
    ConnectRequested,
    /// The wallet authorized an account and a binding was made.
    ConnectSucceeded { binding: ContractBinding },
    /// The connection attempt failed or returned no accounts.
    ConnectFailed,
    /// The wallet's account list changed. `binding` is the new signer
    /// binding for the first account, absent when the list is empty.
    AccountsChanged {
        accounts: Vec<AccountAddress>,
        binding: Option<ContractBinding>,
    },
    /// An identity proof was accepted; replaces any previous profile.
    ProofAccepted {
        profile: RevealedProfile,
        proof: Arc<IdentityProof>,
    },
    /// The latest login produced no usable proof; any earlier one is void.
    ProofRejected,
    /// Display-only profile fields were edited.
    DisplayEdited(DisplayFields),
    /// The pending comment text changed.
    CommentDraftChanged(String),
    SubmissionStarted(SubmissionKind),
    SubmissionConfirmed(SubmissionRecord),
    SubmissionFailed(SubmissionKind),
}

// ─── Session ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub connection: ConnectionState,
    pub account: Option<AccountAddress>,
    pub proof_status: ProofStatus,
    pub profile: Option<RevealedProfile>,
    pub proof: Option<Arc<IdentityProof>>,
    pub binding: Option<ContractBinding>,
    /// Incremented every time the binding is replaced or cleared.
    pub binding_generation: u64,
    pub in_flight: Option<SubmissionKind>,
    pub records: Vec<SubmissionRecord>,
    pub comment_draft: String,
    pub last_vote_tx: Option<TxHash>,
    pub last_comment_tx: Option<TxHash>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event.
    pub fn apply(mut self, event: SessionEvent) -> Session {
        match event {
            SessionEvent::ConnectRequested => {
                if self.connection == ConnectionState::Disconnected {
                    self.connection = ConnectionState::Connecting;
                }
            }
            SessionEvent::ConnectSucceeded { binding } => {
                self.bind(Some(binding));
            }
            SessionEvent::ConnectFailed => {
                if self.connection == ConnectionState::Connecting {
                    self.connection = ConnectionState::Disconnected;
                }
            }
            SessionEvent::AccountsChanged { accounts, binding } => {
                let binding = binding.filter(|b| accounts.contains(&b.account));
                self.bind(binding);
            }
            SessionEvent::ProofAccepted { profile, proof } => {
                self.profile = Some(profile);
                self.proof = Some(proof);
                self.proof_status = ProofStatus::Verified;
            }
            SessionEvent::ProofRejected => {
                self.profile = None;
                self.proof = None;
                self.proof_status = ProofStatus::Unverified;
            }
            SessionEvent::DisplayEdited(display) => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.display = display;
                }
            }
            SessionEvent::CommentDraftChanged(text) => {
                self.comment_draft = text;
            }
            SessionEvent::SubmissionStarted(kind) => {
                self.in_flight = Some(kind);
            }
            SessionEvent::SubmissionConfirmed(record) => {
                if self.in_flight == Some(record.kind()) {
                    self.in_flight = None;
                }
                match record.kind() {
                    SubmissionKind::Vote => self.last_vote_tx = Some(record.tx_hash),
                    SubmissionKind::Comment => {
                        self.last_comment_tx = Some(record.tx_hash);
                        self.comment_draft.clear();
                    }
                }
                self.records.push(record);
            }
            SessionEvent::SubmissionFailed(kind) => {
                if self.in_flight == Some(kind) {
                    self.in_flight = None;
                }
            }
        }
        self
    }

    fn bind(&mut self, binding: Option<ContractBinding>) {
        self.binding_generation += 1;
        match binding {
            Some(binding) => {
                self.connection = ConnectionState::Connected;
                self.account = Some(binding.account);
                self.binding = Some(binding);
            }
            None => {
                self.connection = ConnectionState::Disconnected;
                self.account = None;
                self.binding = None;
            }
        }
    }

    /// `(Connected, Verified)` with a binding and a profile in place.
    pub fn is_ready(&self) -> bool {
        self.connection == ConnectionState::Connected
            && self.proof_status == ProofStatus::Verified
            && self.binding.is_some()
            && self.profile.is_some()
            && self.proof.is_some()
    }

    /// Check the submission gate without changing anything.
    pub fn check_gate(&self) -> Result<(), GateError> {
        if !self.is_ready() {
            return Err(GateError::NotReady {
                connection: self.connection,
                proof_status: self.proof_status,
            });
        }
        if let Some(in_flight) = self.in_flight {
            return Err(GateError::SubmissionInProgress { in_flight });
        }
        Ok(())
    }
}
