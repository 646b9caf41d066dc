//! # Identity-Proof Providers
//!
//! The proof system itself lives outside this workspace. Providers are the
//! narrow seam through which a proof enters the pipeline:
//!
//! - [`FileProofProvider`] reads a proof JSON produced by an external prover.
//! - [`FixtureProofProvider`] (feature `fixture`) returns a deterministic
//!   proof for test mode.

use std::collections::BTreeSet;
use std::path::PathBuf;

use async_trait::async_trait;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::error::ProofError;
use crate::proof::IdentityProof;

/// Default nullifier seed used by the reference deployment.
pub const DEFAULT_NULLIFIER_SEED: u64 = 1234;

/// A claim the user may choose to reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealField {
    State,
    Pincode,
    AgeAbove18,
    Gender,
}

impl RevealField {
    pub const ALL: [RevealField; 4] = [
        RevealField::State,
        RevealField::Pincode,
        RevealField::AgeAbove18,
        RevealField::Gender,
    ];
}

/// Parameters of a login request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub fields_to_reveal: BTreeSet<RevealField>,
    pub nullifier_seed: u64,
}

impl Default for LoginRequest {
    /// Reveal every field with the default seed.
    fn default() -> Self {
        Self {
            fields_to_reveal: RevealField::ALL.into_iter().collect(),
            nullifier_seed: DEFAULT_NULLIFIER_SEED,
        }
    }
}

impl LoginRequest {
    pub fn reveals(&self, field: RevealField) -> bool {
        self.fields_to_reveal.contains(&field)
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn(Box<IdentityProof>),
    NotLoggedIn,
}

/// Source of identity proofs.
#[async_trait]
pub trait ProofProvider: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, ProofError>;

    /// Name for log output.
    fn name(&self) -> &str;
}

// ─── File provider ───────────────────────────────────────────────────

/// Reads a proof written by an external prover. A missing file means the
/// user has not logged in yet. The reveal set is fixed by whoever produced
/// the file; only the nullifier seed is checked against the request.
#[derive(Debug, Clone)]
pub struct FileProofProvider {
    path: PathBuf,
}

impl FileProofProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProofProvider for FileProofProvider {
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, ProofError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no proof file, not logged in");
                return Ok(LoginOutcome::NotLoggedIn);
            }
            Err(e) => {
                return Err(ProofError::Provider(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )))
            }
        };
        let proof = IdentityProof::from_json(&content)?;
        if let Some(seed) = proof.nullifier_seed() {
            if seed != U256::from(request.nullifier_seed) {
                tracing::warn!(
                    expected = request.nullifier_seed,
                    actual = %seed,
                    "proof file was generated with a different nullifier seed"
                );
            }
        }
        Ok(LoginOutcome::LoggedIn(Box::new(proof)))
    }

    fn name(&self) -> &str {
        "file"
    }
}

// ─── Fixture provider ────────────────────────────────────────────────

#[cfg(feature = "fixture")]
pub use fixture::FixtureProofProvider;

#[cfg(feature = "fixture")]
mod fixture {
    use anonvote_crypto::keccak256;

    use super::*;
    use crate::proof::{RevealedClaims, PUBLIC_INPUT_COUNT, SNARK_SCALAR_FIELD};

    /// Deterministic proofs for test mode. The nullifier depends only on the
    /// seed, so repeated logins yield the same pseudonym.
    #[derive(Debug, Clone)]
    pub struct FixtureProofProvider {
        state: String,
        pincode: String,
        gender: String,
        logged_in: bool,
    }

    impl Default for FixtureProofProvider {
        fn default() -> Self {
            Self::new("Maharashtra", "400002")
        }
    }

    impl FixtureProofProvider {
        pub fn new(state: impl Into<String>, pincode: impl Into<String>) -> Self {
            Self {
                state: state.into(),
                pincode: pincode.into(),
                gender: "77".into(),
                logged_in: true,
            }
        }

        /// A provider whose user declines to log in.
        pub fn declining() -> Self {
            Self {
                logged_in: false,
                ..Self::default()
            }
        }

        /// Build the fixture proof for a request without going through the trait.
        pub fn proof_for(&self, request: &LoginRequest) -> Result<IdentityProof, ProofError> {
            let modulus = U256::from_dec_str(SNARK_SCALAR_FIELD)
                .map_err(|e| ProofError::Provider(e.to_string()))?;
            let element = |tag: &str, i: u64| {
                let mut input = tag.as_bytes().to_vec();
                input.extend_from_slice(&request.nullifier_seed.to_be_bytes());
                input.extend_from_slice(&i.to_be_bytes());
                U256::from_big_endian(keccak256(input).as_bytes()) % modulus
            };

            let nullifier = element("nullifier", 0);
            let a = [element("a", 0), element("a", 1)];
            let b = [
                [element("b", 0), element("b", 1)],
                [element("b", 2), element("b", 3)],
            ];
            let c = [element("c", 0), element("c", 1)];
            let public_inputs = (0..PUBLIC_INPUT_COUNT as u64)
                .map(|i| element("input", i))
                .collect();

            let reveal = |field, value: &str| request.reveals(field).then(|| value.to_string());
            let claims = RevealedClaims {
                state: reveal(RevealField::State, &self.state),
                pincode: reveal(RevealField::Pincode, &self.pincode),
                age_above_18: request.reveals(RevealField::AgeAbove18).then_some(true),
                gender: reveal(RevealField::Gender, &self.gender),
            };

            Ok(
                IdentityProof::from_parts(nullifier, a, b, c, public_inputs, claims)?
                    .with_nullifier_seed(U256::from(request.nullifier_seed)),
            )
        }
    }

    #[async_trait]
    impl ProofProvider for FixtureProofProvider {
        async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, ProofError> {
            if !self.logged_in {
                return Ok(LoginOutcome::NotLoggedIn);
            }
            self.proof_for(request)
                .map(|proof| LoginOutcome::LoggedIn(Box::new(proof)))
        }

        fn name(&self) -> &str {
            "fixture"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileExtractor;
    use crate::proof::tests::sample_json;
    use std::io::Write;

    #[test]
    fn test_default_request_reveals_everything() {
        let request = LoginRequest::default();
        assert_eq!(request.nullifier_seed, 1234);
        for field in RevealField::ALL {
            assert!(request.reveals(field));
        }
    }

    #[cfg(feature = "fixture")]
    #[tokio::test]
    async fn test_fixture_is_deterministic() {
        let provider = FixtureProofProvider::default();
        let request = LoginRequest::default();
        let first = provider.login(&request).await.unwrap();
        let second = provider.login(&request).await.unwrap();
        assert_eq!(first, second);
        let LoginOutcome::LoggedIn(proof) = first else {
            panic!("fixture should log in");
        };
        let profile = ProfileExtractor::extract(&proof).unwrap();
        assert_eq!(profile.state, "Maharashtra");
        assert_eq!(profile.pincode, "400002");
    }

    #[cfg(feature = "fixture")]
    #[tokio::test]
    async fn test_fixture_nullifier_depends_on_seed() {
        let provider = FixtureProofProvider::default();
        let a = provider.proof_for(&LoginRequest::default()).unwrap();
        let b = provider
            .proof_for(&LoginRequest {
                nullifier_seed: 99,
                ..LoginRequest::default()
            })
            .unwrap();
        assert_ne!(a.nullifier_hash(), b.nullifier_hash());
    }

    #[cfg(feature = "fixture")]
    #[test]
    fn test_fixture_respects_reveal_set() {
        let provider = FixtureProofProvider::default();
        let request = LoginRequest {
            fields_to_reveal: [RevealField::State].into_iter().collect(),
            nullifier_seed: 1234,
        };
        let proof = provider.proof_for(&request).unwrap();
        assert!(proof.claims().pincode.is_none());
        assert!(ProfileExtractor::extract(&proof).is_err());
    }

    #[cfg(feature = "fixture")]
    #[tokio::test]
    async fn test_declining_fixture_not_logged_in() {
        let outcome = FixtureProofProvider::declining()
            .login(&LoginRequest::default())
            .await
            .unwrap();
        assert_eq!(outcome, LoginOutcome::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_file_provider_missing_file_not_logged_in() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileProofProvider::new(dir.path().join("absent.json"));
        let outcome = provider.login(&LoginRequest::default()).await.unwrap();
        assert_eq!(outcome, LoginOutcome::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_file_provider_reads_proof() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", sample_json("Karnataka", "560002")).unwrap();
        let provider = FileProofProvider::new(file.path());
        let LoginOutcome::LoggedIn(proof) = provider.login(&LoginRequest::default()).await.unwrap()
        else {
            panic!("expected a proof");
        };
        assert_eq!(proof.claims().pincode.as_deref(), Some("560002"));
    }

    #[tokio::test]
    async fn test_file_provider_rejects_malformed_proof() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"type\":\"anon-aadhaar\",\"proof\":{{}}}}").unwrap();
        let provider = FileProofProvider::new(file.path());
        assert!(matches!(
            provider.login(&LoginRequest::default()).await,
            Err(ProofError::Invalid { .. })
        ));
    }
}
