//! # Call Preparation
//!
//! Everything that can fail before a transaction is sent. These functions
//! read the eligibility index and the proof, and touch no chain or session
//! state.

use ethers::types::U256;

use anonvote_chain::VoteCall;
use anonvote_eligibility::EligibilityIndex;
use anonvote_zkp::{IdentityProof, RevealedProfile, VerifierEncoding};

use crate::error::SubmissionError;

/// Build the `vote` arguments for a profile, its proof, and a vote option.
///
/// Checks, in order: vote option, eligibility fields, pincode membership.
/// The Merkle proof is flattened to its sibling hashes; the contract
/// verifies with sorted pairs and needs no side information.
pub fn prepare_vote(
    index: &EligibilityIndex,
    encoding: &impl VerifierEncoding,
    profile: &RevealedProfile,
    proof: &IdentityProof,
    vote_option: u64,
) -> Result<VoteCall, SubmissionError> {
    if vote_option < 1 {
        return Err(SubmissionError::InvalidVoteOption {
            option: vote_option,
        });
    }
    let state = profile.state.trim();
    let pincode = profile.pincode.trim();
    if state.is_empty() {
        return Err(SubmissionError::MissingEligibilityFields { field: "state" });
    }
    if pincode.is_empty() {
        return Err(SubmissionError::MissingEligibilityFields { field: "pincode" });
    }

    let inclusion = index
        .prove_inclusion(state, pincode)
        .map_err(|miss| SubmissionError::IneligiblePincode {
            pincode: miss.pincode,
            region: miss.region,
            valid_codes: miss.valid_codes.iter().map(|c| c.as_str().to_string()).collect(),
        })?;

    let args = encoding.encode(proof);
    Ok(VoteCall {
        vote_option: U256::from(vote_option),
        a: args.a,
        b: args.b,
        c: args.c,
        public_inputs: args.public_inputs,
        merkle_proof: inclusion.siblings(),
    })
}

/// Validate a comment and return the text to submit (trimmed).
pub fn prepare_comment(text: &str) -> Result<String, SubmissionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SubmissionError::EmptyComment);
    }
    Ok(trimmed.to_string())
}
