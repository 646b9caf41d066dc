//! # Verifier Encoding
//!
//! Maps an [`IdentityProof`] onto the argument tuple the on-chain Groth16
//! verifier expects. snarkjs emits G2 points with the Fp2 limbs in
//! `(c0, c1)` order, while the EVM pairing precompile takes `(c1, c0)`, so
//! each row of `b` is swapped here and nowhere else.

use ethers::types::U256;

use crate::proof::{IdentityProof, PUBLIC_INPUT_COUNT};

/// Verifier call arguments, in EVM order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierArgs {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
    pub public_inputs: [U256; PUBLIC_INPUT_COUNT],
}

/// A mapping from identity proofs to verifier arguments.
pub trait VerifierEncoding {
    fn encode(&self, proof: &IdentityProof) -> VerifierArgs;
}

/// The Groth16-for-EVM encoding used by snarkjs-generated verifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Groth16EvmEncoding;

impl VerifierEncoding for Groth16EvmEncoding {
    fn encode(&self, proof: &IdentityProof) -> VerifierArgs {
        let b = proof.b();
        let mut public_inputs = [U256::zero(); PUBLIC_INPUT_COUNT];
        // Arity is fixed when the proof is validated.
        for (slot, value) in public_inputs.iter_mut().zip(proof.public_inputs()) {
            *slot = *value;
        }
        VerifierArgs {
            a: *proof.a(),
            b: [[b[0][1], b[0][0]], [b[1][1], b[1][0]]],
            c: *proof.c(),
            public_inputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::tests::sample_json;

    #[test]
    fn test_b_limbs_swapped() {
        let proof = IdentityProof::from_value(sample_json("Maharashtra", "400002")).unwrap();
        let args = Groth16EvmEncoding.encode(&proof);
        assert_eq!(args.b[0], [U256::from(22), U256::from(21)]);
        assert_eq!(args.b[1], [U256::from(24), U256::from(23)]);
    }

    #[test]
    fn test_a_c_and_inputs_pass_through() {
        let proof = IdentityProof::from_value(sample_json("Maharashtra", "400002")).unwrap();
        let args = Groth16EvmEncoding.encode(&proof);
        assert_eq!(args.a, [U256::from(11), U256::from(12)]);
        assert_eq!(args.c, [U256::from(31), U256::from(32)]);
        assert_eq!(&args.public_inputs[..], proof.public_inputs());
        assert_eq!(args.public_inputs[29], U256::from(210));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let proof = IdentityProof::from_value(sample_json("Karnataka", "560001")).unwrap();
        assert_eq!(Groth16EvmEncoding.encode(&proof), Groth16EvmEncoding.encode(&proof));
    }
}
