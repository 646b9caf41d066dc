//! # anonvote-chain — Chain-Facing Seams
//!
//! - **VotingContract** (`contract.rs`): `vote` / `addComment` calldata and
//!   the signer-bound contract trait.
//! - **WalletProvider** (`wallet.rs`): account authorization, account-change
//!   subscription, signer binding.
//! - **ClientConfig** (`config.rs`): `ANONVOTE_*` environment configuration.
//! - **Ethers adapters** (`ethers_client.rs`): local-key wallet and JSON-RPC
//!   contract client.
//! - **Mocks** (`mock.rs`, feature `mock`): recording doubles for tests.

pub mod config;
pub mod contract;
pub mod error;
pub mod ethers_client;
#[cfg(feature = "mock")]
pub mod mock;
pub mod wallet;

pub use config::{ClientConfig, ConfigError};
pub use contract::{
    add_comment_calldata, ContractBinding, TxReceipt, VoteCall, VotingContract, VOTE_PUBLIC_INPUTS,
};
pub use error::{ChainError, GENERIC_NETWORK_MESSAGE};
pub use ethers_client::{EthersVotingContract, EthersWallet};
#[cfg(feature = "mock")]
pub use mock::{MockVotingContract, MockWalletProvider, RecordedCall};
pub use wallet::{AccountEvents, WalletProvider};
