//! # JSON-RPC Adapters (ethers)
//!
//! [`EthersWallet`] is a local-key wallet provider over an HTTP JSON-RPC
//! endpoint. [`EthersVotingContract`] sends `vote` / `addComment`
//! transactions through a `SignerMiddleware` and waits for the receipt.
//!
//! A local key never changes, so the account-change stream never fires:
//! [`WalletProvider::subscribe`] hands back an already-closed receiver.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::prelude::*;
use ethers::providers::MiddlewareError;
use ethers::types::{Address, Bytes};
use tokio::sync::mpsc;

use anonvote_core::{AccountAddress, Bytes32, TxHash};

use crate::config::{ClientConfig, ConfigError};
use crate::contract::{add_comment_calldata, TxReceipt, VoteCall, VotingContract};
use crate::error::ChainError;
use crate::wallet::{AccountEvents, WalletProvider};

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

fn to_address(account: AccountAddress) -> Address {
    Address::from(account.0)
}

fn from_address(address: Address) -> AccountAddress {
    AccountAddress(address.0)
}

fn to_tx_hash(hash: H256) -> TxHash {
    TxHash(Bytes32(hash.0))
}

/// Wallet provider backed by a private key held in process.
pub struct EthersWallet {
    provider: Provider<Http>,
    wallet: LocalWallet,
    confirmation_timeout: Option<Duration>,
}

impl std::fmt::Debug for EthersWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthersWallet")
            .field("account", &from_address(self.wallet.address()).short())
            .field("chain_id", &self.wallet.chain_id())
            .finish()
    }
}

impl EthersWallet {
    /// Build from configuration. Returns `Ok(None)` when no private key is
    /// configured, which callers treat as "no wallet provider".
    pub fn from_config(config: &ClientConfig) -> Result<Option<Self>, ConfigError> {
        let Some(key) = config.private_key.as_ref() else {
            return Ok(None);
        };
        let wallet = key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?
            .with_chain_id(config.chain_id);
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ConfigError::InvalidUrl("ANONVOTE_RPC_URL".to_string(), e.to_string()))?;
        Ok(Some(Self {
            provider,
            wallet,
            confirmation_timeout: config.confirmation_timeout,
        }))
    }

    fn account(&self) -> AccountAddress {
        from_address(self.wallet.address())
    }
}

#[async_trait]
impl WalletProvider for EthersWallet {
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ChainError> {
        // Probe the node so an unreachable endpoint fails the connect step.
        self.provider
            .get_chainid()
            .await
            .map_err(|e| ChainError::ConnectionRejected(e.to_string()))?;
        Ok(vec![self.account()])
    }

    async fn list_accounts(&self) -> Result<Vec<AccountAddress>, ChainError> {
        Ok(vec![self.account()])
    }

    async fn bind(
        &self,
        account: AccountAddress,
        contract: AccountAddress,
    ) -> Result<Arc<dyn VotingContract>, ChainError> {
        if account != self.account() {
            return Err(ChainError::ConnectionRejected(format!(
                "no signer for account {}",
                account.short()
            )));
        }
        let client = SignerMiddleware::new(self.provider.clone(), self.wallet.clone());
        Ok(Arc::new(EthersVotingContract {
            client: Arc::new(client),
            address: to_address(contract),
            confirmation_timeout: self.confirmation_timeout,
        }))
    }

    fn subscribe(&self) -> AccountEvents {
        // Sender dropped here: the stream ends without events.
        let (_tx, rx) = mpsc::unbounded_channel();
        rx
    }
}

/// The voting contract reached through a signer-bound JSON-RPC client.
pub struct EthersVotingContract {
    client: Arc<Client>,
    address: Address,
    confirmation_timeout: Option<Duration>,
}

impl std::fmt::Debug for EthersVotingContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthersVotingContract")
            .field("address", &self.address)
            .finish()
    }
}

impl EthersVotingContract {
    async fn send(&self, method: &'static str, calldata: Bytes) -> Result<TxReceipt, ChainError> {
        let tx = TransactionRequest::new().to(self.address).data(calldata);

        tracing::debug!(method, contract = ?self.address, "sending transaction");
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| ChainError::Rejected {
                reason: rpc_reason(&e),
            })?;
        let tx_hash = to_tx_hash(pending.tx_hash());
        tracing::info!(method, %tx_hash, "transaction submitted");

        let receipt = match self.confirmation_timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| ChainError::Unconfirmed { tx_hash })?,
            None => pending.await,
        }
        .map_err(|e| ChainError::Provider(e.to_string()))?
        .ok_or_else(|| ChainError::Provider(format!("transaction {tx_hash} was dropped")))?;

        if receipt.status == Some(U64::zero()) {
            return Err(ChainError::Reverted {
                tx_hash,
                reason: None,
            });
        }
        Ok(TxReceipt {
            tx_hash: to_tx_hash(receipt.transaction_hash),
            block_number: receipt.block_number.map(|n| n.as_u64()),
        })
    }
}

#[async_trait]
impl VotingContract for EthersVotingContract {
    fn address(&self) -> AccountAddress {
        from_address(self.address)
    }

    async fn vote(&self, call: &VoteCall) -> Result<TxReceipt, ChainError> {
        self.send("vote", call.calldata()).await
    }

    async fn add_comment(&self, comment: &str) -> Result<TxReceipt, ChainError> {
        self.send("addComment", add_comment_calldata(comment)).await
    }
}

/// The node's error message, when the failure came back as a JSON-RPC error.
fn rpc_reason<E: MiddlewareError>(err: &E) -> Option<String> {
    err.as_error_response().map(|resp| resp.message.clone())
}
