//! # Voting Contract Interface
//!
//! The contract exposes two entry points, neither of which returns a value:
//!
//! ```text
//! vote(uint256 voteOption, uint256[2] a, uint256[2][2] b, uint256[2] c,
//!      uint256[30] publicInputs, bytes32[] merkleProof)
//! addComment(string comment)
//! ```
//!
//! Calldata is encoded here with `ethers::abi` tokens so the layout is
//! checked in one place, independent of which transport sends it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Bytes, U256};
use serde::{Deserialize, Serialize};

use anonvote_core::{AccountAddress, Bytes32, TxHash};

use crate::error::ChainError;

/// Public inputs accepted by `vote`.
pub const VOTE_PUBLIC_INPUTS: usize = 30;

pub const VOTE_SIGNATURE: &str =
    "vote(uint256,uint256[2],uint256[2][2],uint256[2],uint256[30],bytes32[])";
pub const ADD_COMMENT_SIGNATURE: &str = "addComment(string)";

/// Arguments for one `vote` call, already in EVM order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCall {
    pub vote_option: U256,
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
    pub public_inputs: [U256; VOTE_PUBLIC_INPUTS],
    pub merkle_proof: Vec<Bytes32>,
}

impl VoteCall {
    /// ABI calldata: selector followed by the encoded arguments.
    pub fn calldata(&self) -> Bytes {
        let uints =
            |values: &[U256]| Token::FixedArray(values.iter().copied().map(Token::Uint).collect());
        let args = [
            Token::Uint(self.vote_option),
            uints(&self.a[..]),
            Token::FixedArray(self.b.iter().map(|row| uints(&row[..])).collect()),
            uints(&self.c[..]),
            uints(&self.public_inputs[..]),
            Token::Array(
                self.merkle_proof
                    .iter()
                    .map(|h| Token::FixedBytes(h.as_bytes().to_vec()))
                    .collect(),
            ),
        ];
        with_selector(VOTE_SIGNATURE, &args)
    }
}

/// ABI calldata for `addComment(comment)`.
pub fn add_comment_calldata(comment: &str) -> Bytes {
    with_selector(ADD_COMMENT_SIGNATURE, &[Token::String(comment.to_string())])
}

fn with_selector(signature: &str, args: &[Token]) -> Bytes {
    let mut data = ethers::utils::id(signature).to_vec();
    data.extend_from_slice(&ethers::abi::encode(args));
    Bytes::from(data)
}

/// A confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// The voting contract, bound to a signer.
#[async_trait]
pub trait VotingContract: Send + Sync + fmt::Debug {
    /// Address the binding targets.
    fn address(&self) -> AccountAddress;

    /// Send `vote` and wait for confirmation.
    async fn vote(&self, call: &VoteCall) -> Result<TxReceipt, ChainError>;

    /// Send `addComment` and wait for confirmation.
    async fn add_comment(&self, comment: &str) -> Result<TxReceipt, ChainError>;
}

/// A signer account bound to the contract. Replaced wholesale whenever the
/// wallet's account list changes.
#[derive(Clone)]
pub struct ContractBinding {
    pub account: AccountAddress,
    pub contract: Arc<dyn VotingContract>,
}

impl ContractBinding {
    pub fn new(account: AccountAddress, contract: Arc<dyn VotingContract>) -> Self {
        Self { account, contract }
    }
}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("account", &self.account.short())
            .field("contract", &self.contract.address().short())
            .finish()
    }
}
