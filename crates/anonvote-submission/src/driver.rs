//! # Session Driver
//!
//! Connects the [`SessionMachine`] to its external collaborators. The
//! driver performs the async wallet and proof-provider calls and then
//! applies the resulting event; it never holds the session across an await.
//!
//! Account changes arrive on one channel and are applied in arrival order
//! by [`SessionDriver::run_account_events`].

use std::sync::Arc;

use anonvote_chain::{AccountEvents, ChainError, ContractBinding, WalletProvider};
use anonvote_core::AccountAddress;
use anonvote_state::{Session, SessionEvent, SessionMachine};
use anonvote_zkp::{
    DisplayFields, LoginOutcome, LoginRequest, ProfileExtractor, ProofProvider, RevealedProfile,
};

use crate::error::DriverError;

#[derive(Clone)]
pub struct SessionDriver {
    machine: Arc<SessionMachine>,
    wallet: Option<Arc<dyn WalletProvider>>,
    proofs: Arc<dyn ProofProvider>,
    contract_address: AccountAddress,
}

impl std::fmt::Debug for SessionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionDriver")
            .field("wallet", &self.wallet)
            .field("proofs", &self.proofs.name())
            .field("contract_address", &self.contract_address)
            .finish()
    }
}

impl SessionDriver {
    /// `wallet` is `None` when no wallet provider is available.
    pub fn new(
        machine: Arc<SessionMachine>,
        wallet: Option<Arc<dyn WalletProvider>>,
        proofs: Arc<dyn ProofProvider>,
        contract_address: AccountAddress,
    ) -> Self {
        Self {
            machine,
            wallet,
            proofs,
            contract_address,
        }
    }

    pub fn machine(&self) -> &Arc<SessionMachine> {
        &self.machine
    }

    fn wallet(&self) -> Result<&Arc<dyn WalletProvider>, ChainError> {
        self.wallet.as_ref().ok_or(ChainError::NoWalletProvider)
    }

    async fn bind(&self, account: AccountAddress) -> Result<ContractBinding, ChainError> {
        let contract = self.wallet()?.bind(account, self.contract_address).await?;
        Ok(ContractBinding::new(account, contract))
    }

    /// Silent start-up: reconnect only if an account is already authorized.
    pub async fn startup(&self) -> Session {
        let Some(wallet) = self.wallet.as_ref() else {
            tracing::warn!("no wallet provider; staying disconnected");
            return self.machine.snapshot();
        };
        let accounts = match wallet.list_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                tracing::warn!(error = %err, "listing accounts failed");
                return self.machine.snapshot();
            }
        };
        let Some(&account) = accounts.first() else {
            tracing::debug!("no previously authorized account");
            return self.machine.snapshot();
        };
        match self.bind(account).await {
            Ok(binding) => {
                tracing::info!(account = %account.short(), "reconnected to authorized account");
                self.machine.apply(SessionEvent::ConnectSucceeded { binding })
            }
            Err(err) => {
                tracing::warn!(error = %err, "binding authorized account failed");
                self.machine.snapshot()
            }
        }
    }

    /// Explicit connect: ask the wallet to authorize an account.
    pub async fn connect(&self) -> Result<AccountAddress, DriverError> {
        self.machine.apply(SessionEvent::ConnectRequested);
        match self.try_connect().await {
            Ok(binding) => {
                let account = binding.account;
                tracing::info!(account = %account.short(), "wallet connected");
                self.machine.apply(SessionEvent::ConnectSucceeded { binding });
                Ok(account)
            }
            Err(err) => {
                tracing::warn!(error = %err, "wallet connection failed");
                self.machine.apply(SessionEvent::ConnectFailed);
                Err(err.into())
            }
        }
    }

    async fn try_connect(&self) -> Result<ContractBinding, ChainError> {
        let accounts = self.wallet()?.request_accounts().await?;
        let account = *accounts.first().ok_or(ChainError::NoAccounts)?;
        self.bind(account).await
    }

    /// Log in with the identity-proof provider. `Ok(None)` means the user
    /// did not log in; the session is unchanged. A failed login clears any
    /// previously accepted proof.
    pub async fn login(&self, request: &LoginRequest) -> Result<Option<RevealedProfile>, DriverError> {
        let outcome = self
            .proofs
            .login(request)
            .await
            .and_then(|outcome| match outcome {
                LoginOutcome::LoggedIn(proof) => {
                    ProfileExtractor::extract(&proof).map(|profile| Some((profile, proof)))
                }
                LoginOutcome::NotLoggedIn => Ok(None),
            });
        let (profile, proof) = match outcome {
            Ok(Some(accepted)) => accepted,
            Ok(None) => {
                tracing::info!(provider = self.proofs.name(), "not logged in");
                return Ok(None);
            }
            Err(err) => {
                tracing::warn!(provider = self.proofs.name(), error = %err, "identity proof rejected");
                self.machine.apply(SessionEvent::ProofRejected);
                return Err(err.into());
            }
        };
        tracing::info!(
            provider = self.proofs.name(),
            state = %profile.state,
            nullifier_hash = %profile.nullifier_hash,
            "identity proof accepted"
        );
        self.machine.apply(SessionEvent::ProofAccepted {
            profile: profile.clone(),
            proof: Arc::from(proof),
        });
        Ok(Some(profile))
    }

    /// Re-derive the connection from a new account list, rebinding the
    /// signer when the list is non-empty.
    pub async fn handle_accounts(&self, accounts: Vec<AccountAddress>) -> Session {
        let binding = match accounts.first() {
            Some(&account) => match self.bind(account).await {
                Ok(binding) => Some(binding),
                Err(err) => {
                    tracing::warn!(error = %err, "rebinding after account change failed");
                    None
                }
            },
            None => None,
        };
        tracing::info!(
            accounts = accounts.len(),
            rebound = binding.is_some(),
            "wallet accounts changed"
        );
        self.machine
            .apply(SessionEvent::AccountsChanged { accounts, binding })
    }

    /// Subscribe to the wallet's account-change stream.
    pub fn subscribe(&self) -> Result<AccountEvents, DriverError> {
        Ok(self.wallet()?.subscribe())
    }

    /// Apply account changes in arrival order until the stream closes.
    pub async fn run_account_events(&self, mut events: AccountEvents) {
        while let Some(accounts) = events.recv().await {
            self.handle_accounts(accounts).await;
        }
        tracing::debug!("account event stream closed");
    }

    /// Edit display-only profile fields.
    pub fn edit_display(&self, display: DisplayFields) -> Session {
        self.machine.apply(SessionEvent::DisplayEdited(display))
    }

    pub fn set_comment_draft(&self, text: impl Into<String>) -> Session {
        self.machine
            .apply(SessionEvent::CommentDraftChanged(text.into()))
    }
}
