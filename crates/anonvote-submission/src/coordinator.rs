//! # Submission Coordinator
//!
//! Drives one submission from gate to ledger:
//!
//! ```text
//! begin (gate + in-flight) ─▶ prepare ─▶ send + confirm ─▶ record
//!        │                       │              │
//!   NotReady / InProgress   local error    SubmissionRejected
//! ```
//!
//! Exactly one chain call per accepted submission. The in-flight marker is
//! held by the session ticket for the whole sequence, so a concurrent
//! attempt fails fast with `SubmissionInProgress`.

use std::sync::Arc;

use anonvote_chain::TxReceipt;
use anonvote_eligibility::EligibilityIndex;
use anonvote_state::{SessionMachine, SubmissionKind, SubmissionPayload};
use anonvote_zkp::Groth16EvmEncoding;

use crate::error::SubmissionError;
use crate::prepare::{prepare_comment, prepare_vote};

/// Default vote option when the caller does not pick one.
pub const DEFAULT_VOTE_OPTION: u64 = 1;

#[derive(Debug, Clone)]
pub struct SubmissionCoordinator {
    eligibility: Arc<EligibilityIndex>,
    encoding: Groth16EvmEncoding,
}

impl SubmissionCoordinator {
    pub fn new(eligibility: Arc<EligibilityIndex>) -> Self {
        Self {
            eligibility,
            encoding: Groth16EvmEncoding,
        }
    }

    pub fn eligibility(&self) -> &EligibilityIndex {
        &self.eligibility
    }

    /// Cast a vote for the session's verified profile.
    pub async fn submit_vote(
        &self,
        session: &SessionMachine,
        vote_option: u64,
    ) -> Result<TxReceipt, SubmissionError> {
        let ticket = session.begin(SubmissionKind::Vote)?;
        let call = prepare_vote(
            &self.eligibility,
            &self.encoding,
            ticket.profile(),
            ticket.proof(),
            vote_option,
        )?;
        let contract = Arc::clone(&ticket.binding().contract);

        tracing::info!(
            account = %ticket.binding().account.short(),
            vote_option,
            siblings = call.merkle_proof.len(),
            "submitting vote"
        );
        match contract.vote(&call).await {
            Ok(receipt) => {
                tracing::info!(tx_hash = %receipt.tx_hash, "vote confirmed");
                ticket.confirm(SubmissionPayload::Vote { option: vote_option }, receipt.tx_hash);
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "vote rejected");
                ticket.fail();
                Err(err.into())
            }
        }
    }

    /// Post a comment. No eligibility gate beyond session readiness.
    pub async fn submit_comment(
        &self,
        session: &SessionMachine,
        text: &str,
    ) -> Result<TxReceipt, SubmissionError> {
        let ticket = session.begin(SubmissionKind::Comment)?;
        let comment = prepare_comment(text)?;
        let contract = Arc::clone(&ticket.binding().contract);

        tracing::info!(
            account = %ticket.binding().account.short(),
            chars = comment.chars().count(),
            "submitting comment"
        );
        match contract.add_comment(&comment).await {
            Ok(receipt) => {
                tracing::info!(tx_hash = %receipt.tx_hash, "comment confirmed");
                ticket.confirm(SubmissionPayload::Comment { text: comment }, receipt.tx_hash);
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "comment rejected");
                ticket.fail();
                Err(err.into())
            }
        }
    }

    /// Post the session's pending comment draft.
    pub async fn submit_comment_draft(
        &self,
        session: &SessionMachine,
    ) -> Result<TxReceipt, SubmissionError> {
        let draft = session.snapshot().comment_draft;
        self.submit_comment(session, &draft).await
    }
}
