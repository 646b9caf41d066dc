//! Chain and wallet errors.

use thiserror::Error;

use anonvote_core::{ErrorCategory, TxHash};

/// Message used when the chain gives no reason for a failure.
pub const GENERIC_NETWORK_MESSAGE: &str = "network error: the transaction could not be completed";

/// Errors from the wallet provider or the voting contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// No wallet provider is configured.
    #[error("no wallet provider available")]
    NoWalletProvider,

    /// The wallet returned no authorized accounts.
    #[error("no accounts authorized")]
    NoAccounts,

    /// The user or the wallet refused the connection request.
    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),

    /// The transaction was refused before it was mined.
    #[error("transaction rejected: {}", .reason.as_deref().unwrap_or(GENERIC_NETWORK_MESSAGE))]
    Rejected { reason: Option<String> },

    /// The transaction was mined but reverted.
    #[error("transaction {tx_hash} reverted: {}", .reason.as_deref().unwrap_or(GENERIC_NETWORK_MESSAGE))]
    Reverted {
        tx_hash: TxHash,
        reason: Option<String>,
    },

    /// The transaction was sent but not confirmed within the configured wait.
    #[error("transaction {tx_hash} not confirmed in time")]
    Unconfirmed { tx_hash: TxHash },

    /// Transport or node failure.
    #[error("provider error: {0}")]
    Provider(String),
}

impl ChainError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoWalletProvider | Self::NoAccounts | Self::ConnectionRejected(_) => {
                ErrorCategory::Connectivity
            }
            Self::Rejected { .. }
            | Self::Reverted { .. }
            | Self::Unconfirmed { .. }
            | Self::Provider(_) => ErrorCategory::Submission,
        }
    }

    /// The chain's own reason when present, else the generic network message.
    pub fn reason(&self) -> String {
        match self {
            Self::Rejected { reason } | Self::Reverted { reason, .. } => reason
                .clone()
                .unwrap_or_else(|| GENERIC_NETWORK_MESSAGE.to_string()),
            other => other.to_string(),
        }
    }
}
