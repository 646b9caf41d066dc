//! Wiring: builds the eligibility index, proof provider, wallet, session
//! driver and coordinator from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use anonvote_chain::{
    ClientConfig, EthersWallet, MockVotingContract, MockWalletProvider, VotingContract,
    WalletProvider,
};
use anonvote_core::AccountAddress;
use anonvote_eligibility::{EligibilityIndex, EligibilityList};
use anonvote_state::{ConnectionState, SessionMachine};
use anonvote_submission::{SessionDriver, SubmissionCoordinator};
use anonvote_zkp::{
    FileProofProvider, FixtureProofProvider, LoginRequest, ProofError, ProofProvider,
    RevealedProfile,
};

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub eligibility_path: Option<PathBuf>,
    pub test_mode: bool,
    pub nullifier_seed: u64,
    pub proof_file: PathBuf,
    /// Use in-memory wallet and contract instead of the configured chain.
    pub dry_run: bool,
}

impl AppOptions {
    pub fn login_request(&self) -> LoginRequest {
        LoginRequest {
            nullifier_seed: self.nullifier_seed,
            ..LoginRequest::default()
        }
    }

    pub fn proof_provider(&self) -> Arc<dyn ProofProvider> {
        if self.test_mode {
            Arc::new(FixtureProofProvider::default())
        } else {
            Arc::new(FileProofProvider::new(self.proof_file.clone()))
        }
    }
}

/// Load the eligibility list from a file, or fall back to the built-in list.
pub fn load_index(path: Option<&Path>) -> anyhow::Result<EligibilityIndex> {
    let list = match path {
        Some(path) => EligibilityList::load(path)
            .with_context(|| format!("loading eligibility list {}", path.display()))?,
        None => EligibilityList::sample(),
    };
    tracing::debug!(regions = list.len(), "eligibility list loaded");
    Ok(EligibilityIndex::new(list))
}

/// A fully wired client session.
pub struct App {
    pub driver: SessionDriver,
    pub coordinator: SubmissionCoordinator,
    login: LoginRequest,
}

impl App {
    pub fn new(options: &AppOptions) -> anyhow::Result<Self> {
        let index = Arc::new(load_index(options.eligibility_path.as_deref())?);
        let machine = Arc::new(SessionMachine::new());

        let (wallet, contract_address): (Option<Arc<dyn WalletProvider>>, AccountAddress) =
            if options.dry_run {
                let contract = Arc::new(MockVotingContract::default());
                let address = contract.address();
                let wallet: Arc<dyn WalletProvider> = Arc::new(MockWalletProvider::authorized(
                    vec![AccountAddress([0x11; 20])],
                    contract,
                ));
                tracing::info!("dry run: using in-memory wallet and contract");
                (Some(wallet), address)
            } else {
                let config = ClientConfig::from_env()?;
                tracing::debug!(?config, "client configuration");
                let wallet = EthersWallet::from_config(&config)?
                    .map(|w| Arc::new(w) as Arc<dyn WalletProvider>);
                (wallet, config.contract_address)
            };

        let driver = SessionDriver::new(machine, wallet, options.proof_provider(), contract_address);
        Ok(Self {
            driver,
            coordinator: SubmissionCoordinator::new(index),
            login: options.login_request(),
        })
    }

    /// Connect (silently if possible) and log in, leaving the session ready.
    pub async fn ready_session(&self) -> anyhow::Result<RevealedProfile> {
        let session = self.driver.startup().await;
        if session.connection != ConnectionState::Connected {
            let account = self.driver.connect().await?;
            tracing::debug!(account = %account.short(), "connected");
        }
        self.driver
            .login(&self.login)
            .await?
            .ok_or(ProofError::Provider("not logged in with the identity provider".into()))
            .map_err(anyhow::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anonvote_core::Region;

    #[test]
    fn test_load_index_from_file_matches_builtin_roots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eligibility.yaml");
        std::fs::write(&path, "Karnataka: [\"560003\", \"560001\", \"560002\"]\n").unwrap();
        let loaded = load_index(Some(&path)).unwrap();
        let builtin = load_index(None).unwrap();
        let region = Region::new("Karnataka").unwrap();
        assert_eq!(loaded.list().len(), 1);
        assert_eq!(
            loaded.build_tree(&region).unwrap(),
            builtin.build_tree(&region).unwrap()
        );
    }

    #[test]
    fn test_missing_list_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_index(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert_eq!(crate::exit::exit_code(&err), 2);
    }

    #[tokio::test]
    async fn test_dry_run_session_becomes_ready() {
        let app = App::new(&AppOptions {
            eligibility_path: None,
            test_mode: true,
            nullifier_seed: 1234,
            proof_file: PathBuf::from("unused.json"),
            dry_run: true,
        })
        .unwrap();
        let profile = app.ready_session().await.unwrap();
        assert_eq!(profile.state, "Maharashtra");
        assert!(app.driver.machine().snapshot().is_ready());
    }
}
