//! # Identity Subcommands
//!
//! `login` obtains a proof from the configured provider and prints the
//! revealed profile. `proof show` dumps the raw proof for debugging.

use clap::{Args, Subcommand};

use anonvote_zkp::{LoginOutcome, ProfileExtractor, ProofError, RevealedProfile};

use crate::app::AppOptions;

/// Arguments for the proof subcommand.
#[derive(Args, Debug)]
pub struct ProofArgs {
    #[command(subcommand)]
    pub command: ProofCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProofCommand {
    /// Print the raw identity proof as JSON.
    Show,
}

async fn login_proof(options: &AppOptions) -> anyhow::Result<anonvote_zkp::IdentityProof> {
    match options.proof_provider().login(&options.login_request()).await? {
        LoginOutcome::LoggedIn(proof) => Ok(*proof),
        LoginOutcome::NotLoggedIn => {
            Err(ProofError::Provider("not logged in with the identity provider".into()).into())
        }
    }
}

pub async fn login(options: &AppOptions) -> anyhow::Result<RevealedProfile> {
    let proof = login_proof(options).await?;
    Ok(ProfileExtractor::extract(&proof)?)
}

pub async fn show(options: &AppOptions) -> anyhow::Result<String> {
    let proof = login_proof(options).await?;
    Ok(proof.to_pretty_json()?)
}
