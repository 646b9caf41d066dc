//! # Revealed Profile Extraction
//!
//! Turns a validated [`IdentityProof`] into the typed [`RevealedProfile`]
//! the rest of the pipeline works with. Extraction is pure: the same proof
//! always yields the same profile.

use serde::{Deserialize, Serialize};

use anonvote_core::NullifierHash;

use crate::error::ProofError;
use crate::proof::IdentityProof;

/// Gender as revealed by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Transgender,
    #[default]
    Undisclosed,
}

impl Gender {
    /// Decode a provider code: the letter itself or its ASCII value.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("M") | Some("77") => Self::Male,
            Some("F") | Some("70") => Self::Female,
            Some("T") | Some("84") => Self::Transgender,
            _ => Self::Undisclosed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Transgender => "transgender",
            Self::Undisclosed => "undisclosed",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-editable fields shown alongside the profile. Never submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayFields {
    pub name: Option<String>,
    pub college_year: Option<String>,
    pub class: Option<String>,
}

/// Attributes revealed by an identity proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedProfile {
    pub state: String,
    pub pincode: String,
    pub age_above_18: bool,
    pub gender: Gender,
    pub nullifier_hash: NullifierHash,
    #[serde(default)]
    pub display: DisplayFields,
}

impl RevealedProfile {
    /// Replace the display-only fields. Revealed attributes are untouched.
    pub fn with_display(mut self, display: DisplayFields) -> Self {
        self.display = display;
        self
    }
}

/// Decodes identity proofs into profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileExtractor;

impl ProfileExtractor {
    /// Extract the revealed profile, requiring `state` and `pincode`.
    pub fn extract(proof: &IdentityProof) -> Result<RevealedProfile, ProofError> {
        let claims = proof.claims();
        let state = required(claims.state.as_deref(), "state")?;
        let pincode = required(claims.pincode.as_deref(), "pincode")?;
        Ok(RevealedProfile {
            state,
            pincode,
            age_above_18: claims.age_above_18.unwrap_or(false),
            gender: Gender::from_code(claims.gender.as_deref()),
            nullifier_hash: proof.nullifier_hash(),
            display: DisplayFields::default(),
        })
    }

    /// Decode a raw JSON proof and extract its profile in one step.
    pub fn extract_json(json: &str) -> Result<(IdentityProof, RevealedProfile), ProofError> {
        let proof = IdentityProof::from_json(json)?;
        let profile = Self::extract(&proof)?;
        Ok((proof, profile))
    }
}

fn required(value: Option<&str>, claim: &'static str) -> Result<String, ProofError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ProofError::MissingClaim { claim }),
    }
}
