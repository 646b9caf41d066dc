//! # Session State Machine
//!
//! Owns the [`Session`] behind a lock and applies events one at a time.
//! The lock is held only for the duration of a transition, never across an
//! await.
//!
//! A submission holds a [`SubmissionTicket`] from the moment it passes the
//! gate until it is confirmed or fails. While a ticket exists, every other
//! submission is turned away with `SubmissionInProgress`. Dropping a ticket
//! without confirming it counts as failure, so an early return or a
//! cancelled future cannot wedge the session.

use std::sync::Arc;

use parking_lot::Mutex;

use anonvote_chain::ContractBinding;
use anonvote_core::TxHash;
use anonvote_zkp::{IdentityProof, RevealedProfile};

use crate::error::GateError;
use crate::session::{
    Session, SessionEvent, SubmissionKind, SubmissionPayload, SubmissionRecord,
};

#[derive(Debug, Default)]
pub struct SessionMachine {
    session: Mutex<Session>,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the resulting session.
    pub fn apply(&self, event: SessionEvent) -> Session {
        let mut guard = self.session.lock();
        let before = (guard.connection, guard.proof_status, guard.in_flight);
        let next = std::mem::take(&mut *guard).apply(event);
        let after = (next.connection, next.proof_status, next.in_flight);
        if before != after {
            tracing::debug!(
                connection = %next.connection,
                proof = %next.proof_status,
                in_flight = ?next.in_flight,
                "session transition"
            );
        }
        *guard = next.clone();
        next
    }

    /// A copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    /// Pass the submission gate and mark `kind` in flight, atomically.
    pub fn begin(&self, kind: SubmissionKind) -> Result<SubmissionTicket<'_>, GateError> {
        let mut guard = self.session.lock();
        guard.check_gate()?;
        let (Some(binding), Some(profile), Some(proof)) =
            (guard.binding.clone(), guard.profile.clone(), guard.proof.clone())
        else {
            return Err(GateError::NotReady {
                connection: guard.connection,
                proof_status: guard.proof_status,
            });
        };
        let generation = guard.binding_generation;
        *guard = std::mem::take(&mut *guard).apply(SessionEvent::SubmissionStarted(kind));
        drop(guard);

        tracing::debug!(%kind, generation, "submission gate passed");
        Ok(SubmissionTicket {
            machine: self,
            kind,
            binding,
            profile,
            proof,
            generation,
            settled: false,
        })
    }
}

/// Exclusive right to submit, with the session values read at the gate.
#[derive(Debug)]
pub struct SubmissionTicket<'a> {
    machine: &'a SessionMachine,
    kind: SubmissionKind,
    binding: ContractBinding,
    profile: RevealedProfile,
    proof: Arc<IdentityProof>,
    generation: u64,
    settled: bool,
}

impl SubmissionTicket<'_> {
    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }

    pub fn profile(&self) -> &RevealedProfile {
        &self.profile
    }

    pub fn proof(&self) -> &IdentityProof {
        &self.proof
    }

    /// Whether the signer binding read at the gate is still the session's.
    pub fn binding_is_current(&self) -> bool {
        self.machine.session.lock().binding_generation == self.generation
    }

    /// Record the confirmed submission. The record is kept even if the
    /// account changed while the transaction was pending.
    pub fn confirm(mut self, payload: SubmissionPayload, tx_hash: TxHash) -> SubmissionRecord {
        if !self.binding_is_current() {
            tracing::info!(
                %tx_hash,
                "account changed while submission was pending; receipt still recorded"
            );
        }
        let record = SubmissionRecord::new(payload, tx_hash);
        self.machine
            .apply(SessionEvent::SubmissionConfirmed(record.clone()));
        self.settled = true;
        record
    }

    /// Release the in-flight marker without recording anything.
    pub fn fail(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.settled {
            self.settled = true;
            self.machine.apply(SessionEvent::SubmissionFailed(self.kind));
        }
    }
}

impl Drop for SubmissionTicket<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{account, binding, proof_event, ready_session};
    use crate::session::{ConnectionState, ProofStatus};
    use anonvote_core::Bytes32;

    fn ready_machine() -> SessionMachine {
        let machine = SessionMachine::new();
        *machine.session.lock() = ready_session();
        machine
    }

    #[test]
    fn test_begin_requires_ready_session() {
        let machine = SessionMachine::new();
        assert_eq!(
            machine.begin(SubmissionKind::Vote).unwrap_err(),
            GateError::NotReady {
                connection: ConnectionState::Disconnected,
                proof_status: ProofStatus::Unverified,
            }
        );
        machine.apply(proof_event());
        assert!(machine.begin(SubmissionKind::Vote).is_err());
    }

    #[test]
    fn test_second_begin_is_rejected_while_ticket_lives() {
        let machine = ready_machine();
        let ticket = machine.begin(SubmissionKind::Vote).unwrap();
        assert_eq!(
            machine.begin(SubmissionKind::Comment).unwrap_err(),
            GateError::SubmissionInProgress {
                in_flight: SubmissionKind::Vote
            }
        );
        ticket.fail();
        assert!(machine.begin(SubmissionKind::Comment).is_ok());
    }

    #[test]
    fn test_dropped_ticket_releases_gate() {
        let machine = ready_machine();
        {
            let _ticket = machine.begin(SubmissionKind::Comment).unwrap();
            assert!(machine.snapshot().in_flight.is_some());
        }
        assert!(machine.snapshot().in_flight.is_none());
    }

    #[test]
    fn test_confirm_appends_record() {
        let machine = ready_machine();
        let ticket = machine.begin(SubmissionKind::Vote).unwrap();
        let tx = TxHash(Bytes32([1; 32]));
        let record = ticket.confirm(SubmissionPayload::Vote { option: 1 }, tx);
        let session = machine.snapshot();
        assert_eq!(session.records, vec![record]);
        assert_eq!(session.last_vote_tx, Some(tx));
        assert!(session.in_flight.is_none());
    }

    #[test]
    fn test_account_change_during_submission_keeps_receipt() {
        let machine = ready_machine();
        let ticket = machine.begin(SubmissionKind::Vote).unwrap();
        machine.apply(SessionEvent::AccountsChanged {
            accounts: vec![account(2)],
            binding: Some(binding(2)),
        });
        assert!(!ticket.binding_is_current());
        ticket.confirm(SubmissionPayload::Vote { option: 2 }, TxHash(Bytes32([2; 32])));
        let session = machine.snapshot();
        assert_eq!(session.records.len(), 1);
        assert_eq!(session.account, Some(account(2)));
    }

    #[test]
    fn test_ticket_carries_gate_values() {
        let machine = ready_machine();
        let ticket = machine.begin(SubmissionKind::Vote).unwrap();
        assert_eq!(ticket.binding().account, account(1));
        assert_eq!(ticket.profile().state, "Maharashtra");
        assert_eq!(ticket.kind(), SubmissionKind::Vote);
    }
}
