//! # In-Memory Doubles
//!
//! [`MockVotingContract`] records every call and can be told to reject or
//! to hold calls pending until released. [`MockWalletProvider`] serves a
//! mutable account list and pushes changes to subscribers.
//!
//! Locks are released before any await.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, Notify};

use anonvote_core::{AccountAddress, TxHash};
use anonvote_crypto::keccak256;

use crate::contract::{TxReceipt, VoteCall, VotingContract};
use crate::error::ChainError;
use crate::wallet::{AccountEvents, WalletProvider};

/// A call observed by [`MockVotingContract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Vote(VoteCall),
    Comment(String),
}

#[derive(Debug, Default)]
struct ContractState {
    calls: Vec<RecordedCall>,
    reject: Option<ChainError>,
    gate: Option<Arc<Notify>>,
}

#[derive(Debug)]
pub struct MockVotingContract {
    address: AccountAddress,
    state: Mutex<ContractState>,
    nonce: AtomicU64,
}

impl Default for MockVotingContract {
    fn default() -> Self {
        Self::new(AccountAddress([0x5f; 20]))
    }
}

impl MockVotingContract {
    pub fn new(address: AccountAddress) -> Self {
        Self {
            address,
            state: Mutex::new(ContractState::default()),
            nonce: AtomicU64::new(0),
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Fail subsequent calls with `error`.
    pub fn reject_with(&self, error: ChainError) {
        self.state.lock().reject = Some(error);
    }

    /// Hold subsequent calls pending until [`MockVotingContract::release`].
    pub fn hold(&self) {
        self.state.lock().gate = Some(Arc::new(Notify::new()));
    }

    /// Let held calls complete and stop holding new ones.
    pub fn release(&self) {
        if let Some(gate) = self.state.lock().gate.take() {
            gate.notify_waiters();
            gate.notify_one();
        }
    }

    async fn complete(&self, call: RecordedCall) -> Result<TxReceipt, ChainError> {
        let (gate, reject) = {
            let mut state = self.state.lock();
            state.calls.push(call);
            (state.gate.clone(), state.reject.clone())
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(error) = reject {
            return Err(error);
        }
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(TxReceipt {
            tx_hash: TxHash(keccak256(nonce.to_be_bytes())),
            block_number: Some(nonce + 1),
        })
    }
}

#[async_trait]
impl VotingContract for MockVotingContract {
    fn address(&self) -> AccountAddress {
        self.address
    }

    async fn vote(&self, call: &VoteCall) -> Result<TxReceipt, ChainError> {
        self.complete(RecordedCall::Vote(call.clone())).await
    }

    async fn add_comment(&self, comment: &str) -> Result<TxReceipt, ChainError> {
        self.complete(RecordedCall::Comment(comment.to_string())).await
    }
}

// ─── Wallet ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct WalletState {
    accounts: Vec<AccountAddress>,
    authorized: bool,
    refuse: Option<String>,
    subscribers: Vec<mpsc::UnboundedSender<Vec<AccountAddress>>>,
    binds: usize,
}

/// Wallet double. Accounts count as authorized once `request_accounts`
/// succeeds or [`MockWalletProvider::authorized`] is used.
#[derive(Debug)]
pub struct MockWalletProvider {
    contract: Arc<MockVotingContract>,
    state: Mutex<WalletState>,
}

impl MockWalletProvider {
    /// A wallet holding `accounts`, none authorized yet.
    pub fn new(accounts: Vec<AccountAddress>, contract: Arc<MockVotingContract>) -> Self {
        Self {
            contract,
            state: Mutex::new(WalletState {
                accounts,
                ..WalletState::default()
            }),
        }
    }

    /// A wallet whose accounts were authorized in an earlier session.
    pub fn authorized(accounts: Vec<AccountAddress>, contract: Arc<MockVotingContract>) -> Self {
        let wallet = Self::new(accounts, contract);
        wallet.state.lock().authorized = true;
        wallet
    }

    /// Make `request_accounts` fail as if the user declined.
    pub fn refuse_with(&self, reason: impl Into<String>) {
        self.state.lock().refuse = Some(reason.into());
    }

    /// Replace the account list and notify subscribers.
    pub fn set_accounts(&self, accounts: Vec<AccountAddress>) {
        let mut state = self.state.lock();
        state.accounts = accounts.clone();
        state
            .subscribers
            .retain(|tx| tx.send(accounts.clone()).is_ok());
    }

    /// Number of successful `bind` calls.
    pub fn bind_count(&self) -> usize {
        self.state.lock().binds
    }

    pub fn contract(&self) -> Arc<MockVotingContract> {
        Arc::clone(&self.contract)
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ChainError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.refuse.clone() {
            return Err(ChainError::ConnectionRejected(reason));
        }
        state.authorized = true;
        Ok(state.accounts.clone())
    }

    async fn list_accounts(&self) -> Result<Vec<AccountAddress>, ChainError> {
        let state = self.state.lock();
        Ok(if state.authorized {
            state.accounts.clone()
        } else {
            Vec::new()
        })
    }

    async fn bind(
        &self,
        account: AccountAddress,
        _contract: AccountAddress,
    ) -> Result<Arc<dyn VotingContract>, ChainError> {
        let mut state = self.state.lock();
        if !state.accounts.contains(&account) {
            return Err(ChainError::ConnectionRejected(format!(
                "no signer for account {}",
                account.short()
            )));
        }
        state.binds += 1;
        let contract: Arc<dyn VotingContract> = self.contract.clone();
        Ok(contract)
    }

    fn subscribe(&self) -> AccountEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().subscribers.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> AccountAddress {
        AccountAddress([n; 20])
    }

    #[tokio::test]
    async fn test_contract_records_calls_and_issues_distinct_hashes() {
        let contract = MockVotingContract::default();
        let first = contract.add_comment("one").await.unwrap();
        let second = contract.add_comment("two").await.unwrap();
        assert_ne!(first.tx_hash, second.tx_hash);
        assert_eq!(
            contract.calls(),
            vec![
                RecordedCall::Comment("one".into()),
                RecordedCall::Comment("two".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_contract_rejection() {
        let contract = MockVotingContract::default();
        contract.reject_with(ChainError::Rejected { reason: None });
        assert!(contract.add_comment("x").await.is_err());
        assert_eq!(contract.call_count(), 1);
    }

    #[tokio::test]
    async fn test_held_call_completes_after_release() {
        let contract = Arc::new(MockVotingContract::default());
        contract.hold();
        let task = {
            let contract = Arc::clone(&contract);
            tokio::spawn(async move { contract.add_comment("held").await })
        };
        tokio::task::yield_now().await;
        contract.release();
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_wallet_silent_listing_requires_authorization() {
        let wallet = MockWalletProvider::new(vec![account(1)], Arc::default());
        assert!(wallet.list_accounts().await.unwrap().is_empty());
        assert_eq!(wallet.request_accounts().await.unwrap(), vec![account(1)]);
        assert_eq!(wallet.list_accounts().await.unwrap(), vec![account(1)]);
    }

    #[tokio::test]
    async fn test_wallet_pushes_account_changes() {
        let wallet = MockWalletProvider::authorized(vec![account(1)], Arc::default());
        let mut events = wallet.subscribe();
        wallet.set_accounts(vec![]);
        assert_eq!(events.recv().await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_wallet_refusal() {
        let wallet = MockWalletProvider::new(vec![account(1)], Arc::default());
        wallet.refuse_with("user rejected");
        assert!(matches!(
            wallet.request_accounts().await,
            Err(ChainError::ConnectionRejected(_))
        ));
    }
}
