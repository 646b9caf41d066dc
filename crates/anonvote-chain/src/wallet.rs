//! # Wallet Provider Interface
//!
//! The wallet owns account authorization and signing. The session only ever
//! sees account lists, either on demand or pushed through
//! [`WalletProvider::subscribe`], and turns an account into a signer-bound
//! contract with [`WalletProvider::bind`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use anonvote_core::AccountAddress;

use crate::contract::VotingContract;
use crate::error::ChainError;

/// Stream of account lists. An empty list means the wallet disconnected.
pub type AccountEvents = mpsc::UnboundedReceiver<Vec<AccountAddress>>;

#[async_trait]
pub trait WalletProvider: Send + Sync + fmt::Debug {
    /// Ask the user to authorize accounts. May prompt.
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ChainError>;

    /// Accounts already authorized. Never prompts.
    async fn list_accounts(&self) -> Result<Vec<AccountAddress>, ChainError>;

    /// Obtain the signer for `account` and bind it to the contract at
    /// `contract`.
    async fn bind(
        &self,
        account: AccountAddress,
        contract: AccountAddress,
    ) -> Result<Arc<dyn VotingContract>, ChainError>;

    /// Subscribe to account-change notifications.
    fn subscribe(&self) -> AccountEvents;
}
