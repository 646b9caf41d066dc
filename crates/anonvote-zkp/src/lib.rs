//! # anonvote-zkp — Identity Proof Handling
//!
//! This crate does not implement a proof system. It validates proofs
//! produced elsewhere and prepares them for the on-chain verifier.
//!
//! - **IdentityProof** (`proof.rs`): tagged raw shape and its validated form.
//! - **ProfileExtractor** (`profile.rs`): typed revealed profile.
//! - **VerifierEncoding** (`encoding.rs`): Groth16-for-EVM argument layout.
//! - **ProofProvider** (`provider.rs`): login seam, file and fixture providers.

pub mod encoding;
pub mod error;
pub mod profile;
pub mod proof;
pub mod provider;

pub use encoding::{Groth16EvmEncoding, VerifierArgs, VerifierEncoding};
pub use error::ProofError;
pub use profile::{DisplayFields, Gender, ProfileExtractor, RevealedProfile};
pub use proof::{IdentityProof, RawProof, RevealedClaims, PUBLIC_INPUT_COUNT};
#[cfg(feature = "fixture")]
pub use provider::FixtureProofProvider;
pub use provider::{
    FileProofProvider, LoginOutcome, LoginRequest, ProofProvider, RevealField,
    DEFAULT_NULLIFIER_SEED,
};

pub use ethers::types::U256;
