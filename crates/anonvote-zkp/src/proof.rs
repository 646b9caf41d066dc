//! # Identity Proof — Tagged Raw Shape and Validated Form
//!
//! The identity-proof provider hands over duck-typed JSON. It is decoded
//! into [`RawProof`], an internally tagged enum, and then validated into
//! [`IdentityProof`]. Anything that does not match the expected shape is
//! rejected with [`ProofError::Invalid`] at this boundary; nothing
//! downstream inspects ad hoc fields.
//!
//! ## Wire shape (`type = "anon-aadhaar"`)
//!
//! ```json
//! {
//!   "type": "anon-aadhaar",
//!   "proof": {
//!     "groth16Proof": { "pi_a": [..3], "pi_b": [[..2],[..2],[..2]], "pi_c": [..3] },
//!     "publicSignals": [ ..30 decimal field elements ],
//!     "nullifier": "…", "nullifierSeed": "1234", "timestamp": "…",
//!     "ageAbove18": "1", "gender": "77", "pincode": "400002", "state": "Maharashtra"
//!   }
//! }
//! ```
//!
//! Curve points come in snarkjs projective form; the trailing `z`
//! coordinate is accepted and dropped. Unrevealed claims are absent or `"0"`.

use ethers::types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use anonvote_core::NullifierHash;
use anonvote_crypto::keccak256;

use crate::error::ProofError;

/// Number of public inputs the on-chain verifier takes.
pub const PUBLIC_INPUT_COUNT: usize = 30;

/// BN254 scalar field modulus `r` (public inputs must be below it).
pub const SNARK_SCALAR_FIELD: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// BN254 base field modulus `q` (curve coordinates must be below it).
pub const BN254_BASE_FIELD: &str =
    "21888242871839275222246405745257275088696311157297823662689037894645226208583";

// ─── Raw (wire) form ─────────────────────────────────────────────────

/// A raw identity proof as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawProof {
    #[serde(rename = "anon-aadhaar")]
    AnonAadhaar { proof: RawAnonAadhaarProof },
}

/// Body of an `anon-aadhaar` proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnonAadhaarProof {
    pub groth16_proof: RawGroth16Proof,
    pub public_signals: Vec<String>,
    pub nullifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullifier_seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_above18: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
}

/// snarkjs-format Groth16 proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGroth16Proof {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
}

// ─── Validated form ──────────────────────────────────────────────────

/// Claims the provider reports as revealed. `None` means not revealed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevealedClaims {
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub age_above_18: Option<bool>,
    /// Provider gender code (`"M"`, `"F"`, `"T"` or their ASCII codes).
    pub gender: Option<String>,
}

/// A validated identity proof. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProof {
    nullifier: U256,
    nullifier_seed: Option<U256>,
    timestamp: Option<String>,
    a: [U256; 2],
    b: [[U256; 2]; 2],
    c: [U256; 2],
    public_inputs: Vec<U256>,
    claims: RevealedClaims,
}

impl IdentityProof {
    /// Assemble a proof from already-typed parts. Validates field ranges
    /// and the public-input arity.
    pub fn from_parts(
        nullifier: U256,
        a: [U256; 2],
        b: [[U256; 2]; 2],
        c: [U256; 2],
        public_inputs: Vec<U256>,
        claims: RevealedClaims,
    ) -> Result<Self, ProofError> {
        if public_inputs.len() != PUBLIC_INPUT_COUNT {
            return Err(ProofError::invalid(format!(
                "expected {PUBLIC_INPUT_COUNT} public inputs, got {}",
                public_inputs.len()
            )));
        }
        let base = field(BN254_BASE_FIELD)?;
        let scalar = field(SNARK_SCALAR_FIELD)?;
        let coords = a.iter().chain(b.iter().flatten()).chain(c.iter());
        if coords.into_iter().any(|v| *v >= base) {
            return Err(ProofError::invalid("curve coordinate outside the base field"));
        }
        if let Some(i) = public_inputs.iter().position(|v| *v >= scalar) {
            return Err(ProofError::invalid(format!(
                "public input {i} outside the scalar field"
            )));
        }
        Ok(Self {
            nullifier,
            nullifier_seed: None,
            timestamp: None,
            a,
            b,
            c,
            public_inputs,
            claims,
        })
    }

    pub fn with_nullifier_seed(mut self, seed: U256) -> Self {
        self.nullifier_seed = Some(seed);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Decode and validate from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProofError> {
        let raw: RawProof = serde_json::from_str(json)
            .map_err(|e| ProofError::invalid(format!("unexpected proof shape: {e}")))?;
        Self::try_from(raw)
    }

    /// Decode and validate from a parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ProofError> {
        let raw: RawProof = serde_json::from_value(value)
            .map_err(|e| ProofError::invalid(format!("unexpected proof shape: {e}")))?;
        Self::try_from(raw)
    }

    pub fn nullifier(&self) -> U256 {
        self.nullifier
    }

    pub fn nullifier_seed(&self) -> Option<U256> {
        self.nullifier_seed
    }

    /// `keccak256(nullifier)` over its 32-byte big-endian encoding.
    pub fn nullifier_hash(&self) -> NullifierHash {
        let mut be = [0u8; 32];
        self.nullifier.to_big_endian(&mut be);
        NullifierHash(keccak256(be))
    }

    pub fn a(&self) -> &[U256; 2] {
        &self.a
    }

    /// `b` in snarkjs order (`[[x1, x0], [y1, y0]]` is applied at encoding).
    pub fn b(&self) -> &[[U256; 2]; 2] {
        &self.b
    }

    pub fn c(&self) -> &[U256; 2] {
        &self.c
    }

    pub fn public_inputs(&self) -> &[U256] {
        &self.public_inputs
    }

    pub fn claims(&self) -> &RevealedClaims {
        &self.claims
    }

    /// Re-encode into the wire shape (decimal strings, projective points).
    pub fn to_raw(&self) -> RawProof {
        let dec = |v: &U256| v.to_string();
        let claim = |v: &Option<String>| v.as_ref().map(|s| Value::String(s.clone()));
        RawProof::AnonAadhaar {
            proof: RawAnonAadhaarProof {
                groth16_proof: RawGroth16Proof {
                    pi_a: vec![dec(&self.a[0]), dec(&self.a[1]), "1".into()],
                    pi_b: vec![
                        vec![dec(&self.b[0][0]), dec(&self.b[0][1])],
                        vec![dec(&self.b[1][0]), dec(&self.b[1][1])],
                        vec!["1".into(), "0".into()],
                    ],
                    pi_c: vec![dec(&self.c[0]), dec(&self.c[1]), "1".into()],
                    protocol: Some("groth16".into()),
                    curve: Some("bn128".into()),
                },
                public_signals: self.public_inputs.iter().map(dec).collect(),
                nullifier: dec(&self.nullifier),
                nullifier_seed: self.nullifier_seed.as_ref().map(dec),
                timestamp: self.timestamp.clone(),
                age_above18: self
                    .claims
                    .age_above_18
                    .map(|b| Value::String(if b { "1" } else { "0" }.into())),
                gender: claim(&self.claims.gender),
                pincode: claim(&self.claims.pincode),
                state: claim(&self.claims.state),
            },
        }
    }

    /// Pretty JSON of the wire shape, for debug output.
    pub fn to_pretty_json(&self) -> Result<String, ProofError> {
        serde_json::to_string_pretty(&self.to_raw())
            .map_err(|e| ProofError::invalid(format!("cannot serialize proof: {e}")))
    }
}

impl TryFrom<RawProof> for IdentityProof {
    type Error = ProofError;

    fn try_from(raw: RawProof) -> Result<Self, Self::Error> {
        match raw {
            RawProof::AnonAadhaar { proof } => {
                let g = &proof.groth16_proof;
                let a = point(&g.pi_a, "pi_a")?;
                let c = point(&g.pi_c, "pi_c")?;
                if !(2..=3).contains(&g.pi_b.len()) {
                    return Err(ProofError::invalid(format!(
                        "pi_b must have 2 or 3 rows, got {}",
                        g.pi_b.len()
                    )));
                }
                let b = [
                    pair(&g.pi_b[0], "pi_b[0]")?,
                    pair(&g.pi_b[1], "pi_b[1]")?,
                ];
                let public_inputs = proof
                    .public_signals
                    .iter()
                    .enumerate()
                    .map(|(i, s)| parse_field(s, &format!("publicSignals[{i}]")))
                    .collect::<Result<Vec<_>, _>>()?;
                let nullifier = parse_field(&proof.nullifier, "nullifier")?;

                let claims = RevealedClaims {
                    state: claim_text(proof.state.as_ref()),
                    pincode: claim_text(proof.pincode.as_ref()),
                    age_above_18: claim_text(proof.age_above18.as_ref())
                        .map(|s| s == "1" || s.eq_ignore_ascii_case("true")),
                    gender: claim_text(proof.gender.as_ref()),
                };

                let mut out = Self::from_parts(nullifier, a, b, c, public_inputs, claims)?;
                if let Some(seed) = proof.nullifier_seed.as_deref() {
                    out = out.with_nullifier_seed(parse_field(seed, "nullifierSeed")?);
                }
                if let Some(ts) = proof.timestamp {
                    out = out.with_timestamp(ts);
                }
                Ok(out)
            }
        }
    }
}

// ─── Parsing helpers ─────────────────────────────────────────────────

fn field(modulus: &str) -> Result<U256, ProofError> {
    U256::from_dec_str(modulus).map_err(|e| ProofError::invalid(format!("bad modulus: {e}")))
}

/// Parse a decimal (or `0x` hex) field element.
pub(crate) fn parse_field(s: &str, what: &str) -> Result<U256, ProofError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None => U256::from_dec_str(s).ok(),
    };
    parsed.ok_or_else(|| ProofError::invalid(format!("{what} is not a field element: {s:?}")))
}

fn pair(values: &[String], what: &str) -> Result<[U256; 2], ProofError> {
    match values {
        [x, y] => Ok([parse_field(x, what)?, parse_field(y, what)?]),
        _ => Err(ProofError::invalid(format!(
            "{what} must have 2 elements, got {}",
            values.len()
        ))),
    }
}

fn point(values: &[String], what: &str) -> Result<[U256; 2], ProofError> {
    match values.len() {
        2 | 3 => pair(&values[..2], what),
        n => Err(ProofError::invalid(format!(
            "{what} must have 2 or 3 elements, got {n}"
        ))),
    }
}

/// Normalize a claim value; blank and `"0"` mean not revealed.
fn claim_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        _ => return None,
    };
    if text.is_empty() || text == "0" {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_json(state: &str, pincode: &str) -> Value {
        let signals: Vec<String> = (1..=PUBLIC_INPUT_COUNT).map(|i| (i * 7).to_string()).collect();
        json!({
            "type": "anon-aadhaar",
            "proof": {
                "groth16Proof": {
                    "pi_a": ["11", "12", "1"],
                    "pi_b": [["21", "22"], ["23", "24"], ["1", "0"]],
                    "pi_c": ["31", "32", "1"],
                    "protocol": "groth16",
                    "curve": "bn128"
                },
                "publicSignals": signals,
                "nullifier": "987654321",
                "nullifierSeed": "1234",
                "timestamp": "1700000000",
                "ageAbove18": "1",
                "gender": "77",
                "pincode": pincode,
                "state": state
            }
        })
    }

    #[test]
    fn test_parse_valid_proof() {
        let proof = IdentityProof::from_value(sample_json("Maharashtra", "400002")).unwrap();
        assert_eq!(proof.a(), &[U256::from(11), U256::from(12)]);
        assert_eq!(proof.b()[1], [U256::from(23), U256::from(24)]);
        assert_eq!(proof.public_inputs().len(), PUBLIC_INPUT_COUNT);
        assert_eq!(proof.claims().state.as_deref(), Some("Maharashtra"));
        assert_eq!(proof.claims().age_above_18, Some(true));
        assert_eq!(proof.nullifier_seed(), Some(U256::from(1234)));
    }

    #[test]
    fn test_wrong_tag_rejected() {
        let mut v = sample_json("Maharashtra", "400002");
        v["type"] = json!("semaphore");
        assert!(matches!(
            IdentityProof::from_value(v),
            Err(ProofError::Invalid { .. })
        ));
    }

    #[test]
    fn test_wrong_public_input_arity_rejected() {
        let mut v = sample_json("Maharashtra", "400002");
        v["proof"]["publicSignals"] = json!(["1", "2", "3"]);
        let err = IdentityProof::from_value(v).unwrap_err();
        assert!(err.to_string().contains("30 public inputs"));
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let mut v = sample_json("Maharashtra", "400002");
        v["proof"]["groth16Proof"]["pi_a"] = json!(["oops", "12", "1"]);
        assert!(IdentityProof::from_value(v).is_err());
    }

    #[test]
    fn test_out_of_field_public_input_rejected() {
        let mut v = sample_json("Maharashtra", "400002");
        v["proof"]["publicSignals"][4] = json!(SNARK_SCALAR_FIELD);
        let err = IdentityProof::from_value(v).unwrap_err();
        assert!(err.to_string().contains("public input 4"));
    }

    #[test]
    fn test_bad_pi_b_shape_rejected() {
        let mut v = sample_json("Maharashtra", "400002");
        v["proof"]["groth16Proof"]["pi_b"] = json!([["21", "22"]]);
        assert!(IdentityProof::from_value(v).is_err());
    }

    #[test]
    fn test_zero_claim_means_unrevealed() {
        let mut v = sample_json("Maharashtra", "400002");
        v["proof"]["gender"] = json!("0");
        v["proof"]["ageAbove18"] = json!(null);
        let proof = IdentityProof::from_value(v).unwrap();
        assert_eq!(proof.claims().gender, None);
        assert_eq!(proof.claims().age_above_18, None);
    }

    #[test]
    fn test_numeric_and_bool_claims_accepted() {
        let mut v = sample_json("Maharashtra", "400002");
        v["proof"]["pincode"] = json!(400002);
        v["proof"]["ageAbove18"] = json!(true);
        let proof = IdentityProof::from_value(v).unwrap();
        assert_eq!(proof.claims().pincode.as_deref(), Some("400002"));
        assert_eq!(proof.claims().age_above_18, Some(true));
    }

    #[test]
    fn test_raw_reencoding_parses_back() {
        let proof = IdentityProof::from_value(sample_json("Karnataka", "560001")).unwrap();
        let json = proof.to_pretty_json().unwrap();
        assert_eq!(IdentityProof::from_json(&json).unwrap(), proof);
    }

    #[test]
    fn test_nullifier_hash_is_keccak_of_be_bytes() {
        let proof = IdentityProof::from_value(sample_json("Karnataka", "560001")).unwrap();
        let mut be = [0u8; 32];
        U256::from(987654321u64).to_big_endian(&mut be);
        assert_eq!(proof.nullifier_hash(), NullifierHash(keccak256(be)));
    }
}
