//! # Sorted-Pair Merkle Tree
//!
//! Binary Merkle tree over keccak-256 leaves, compatible with the
//! sorted-pair proof check used by the voting contract.
//!
//! ## Algorithm
//!
//! - Leaf: `keccak256(value)`.
//! - Leaves are sorted ascending and deduplicated before the first level is
//!   formed, so the root depends only on the *set* of values.
//! - Node: `keccak256(min(l, r) || max(l, r))`.
//! - A level with an odd node count promotes its last node unchanged to the
//!   next level. Proofs for such nodes skip that level.
//!
//! ## Proofs
//!
//! A [`MerkleProof`] is the ordered list of `(side, sibling)` steps from leaf
//! to root. Verification ignores `side` (the sorted-pair hash is
//! commutative); the side is kept for diagnostics and for callers that want
//! positional verification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use anonvote_core::Bytes32;

use crate::keccak::{hash_pair_sorted, keccak256};

/// Errors constructing Merkle trees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree needs at least one leaf to have a root.
    #[error("cannot build a merkle tree with no leaves")]
    Empty,
}

// ---------------------------------------------------------------------------
// Proof representation
// ---------------------------------------------------------------------------

/// Position of a sibling relative to the node on the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One step of an inclusion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Which side the sibling is on.
    pub side: Side,
    /// The sibling hash.
    pub hash: Bytes32,
}

/// An inclusion proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// The leaf hash being proven.
    pub leaf: Bytes32,
    /// Sibling steps from leaf to root.
    pub path: Vec<PathStep>,
}

impl MerkleProof {
    /// Number of sibling steps.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Sibling hashes in leaf-to-root order, side information dropped.
    ///
    /// This is the `bytes32[]` the contract expects.
    pub fn siblings(&self) -> Vec<Bytes32> {
        self.path.iter().map(|step| step.hash).collect()
    }

    /// Recompute the root with sorted-pair hashing.
    pub fn compute_root(&self) -> Bytes32 {
        self.path
            .iter()
            .fold(self.leaf, |acc, step| hash_pair_sorted(&acc, &step.hash))
    }

    /// Verify this proof against an expected root.
    pub fn verify(&self, root: &Bytes32) -> bool {
        self.compute_root() == *root
    }
}

/// Verify a flattened sibling list the way the contract does.
pub fn verify_siblings(root: &Bytes32, leaf: &Bytes32, siblings: &[Bytes32]) -> bool {
    let computed = siblings
        .iter()
        .fold(*leaf, |acc, sibling| hash_pair_sorted(&acc, sibling));
    computed == *root
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// A fully materialized sorted-pair Merkle tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// `layers[0]` holds the sorted leaves; the last layer holds the root.
    layers: Vec<Vec<Bytes32>>,
}

impl MerkleTree {
    /// Build a tree from raw values; each value is hashed into a leaf.
    pub fn from_values<I, V>(values: I) -> Result<Self, MerkleError>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        Self::from_leaves(values.into_iter().map(keccak256).collect())
    }

    /// Build a tree from precomputed leaf hashes.
    pub fn from_leaves(mut leaves: Vec<Bytes32>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::Empty);
        }
        leaves.sort_unstable();
        leaves.dedup();

        let mut layers = vec![leaves];
        while let Some(level) = layers.last() {
            if level.len() <= 1 {
                break;
            }
            let next: Vec<Bytes32> = level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair_sorted(left, right),
                    [lone, ..] => *lone,
                    [] => Bytes32::ZERO,
                })
                .collect();
            layers.push(next);
        }
        Ok(Self { layers })
    }

    /// The root hash.
    pub fn root(&self) -> Bytes32 {
        self.layers
            .last()
            .and_then(|top| top.first())
            .copied()
            .unwrap_or(Bytes32::ZERO)
    }

    /// Number of distinct leaves.
    pub fn leaf_count(&self) -> usize {
        self.layers.first().map(Vec::len).unwrap_or(0)
    }

    /// Number of levels above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    /// Whether `leaf` is one of this tree's leaves.
    pub fn contains(&self, leaf: &Bytes32) -> bool {
        self.layers
            .first()
            .map(|leaves| leaves.binary_search(leaf).is_ok())
            .unwrap_or(false)
    }

    /// Build an inclusion proof for a leaf hash, or `None` if absent.
    pub fn proof(&self, leaf: &Bytes32) -> Option<MerkleProof> {
        let mut pos = self.layers.first()?.binary_search(leaf).ok()?;
        let mut path = Vec::with_capacity(self.depth());

        for level in &self.layers[..self.layers.len() - 1] {
            let sibling_pos = pos ^ 1;
            if let Some(sibling) = level.get(sibling_pos) {
                let side = if sibling_pos < pos { Side::Left } else { Side::Right };
                path.push(PathStep {
                    side,
                    hash: *sibling,
                });
            }
            pos /= 2;
        }

        Some(MerkleProof { leaf: *leaf, path })
    }

    /// Build an inclusion proof for a raw value.
    pub fn proof_for_value(&self, value: impl AsRef<[u8]>) -> Option<MerkleProof> {
        self.proof(&keccak256(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAHARASHTRA: [&str; 4] = ["400001", "400002", "411001", "411002"];

    #[test]
    fn test_empty_tree_rejected() {
        assert_eq!(
            MerkleTree::from_leaves(Vec::new()).unwrap_err(),
            MerkleError::Empty
        );
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let tree = MerkleTree::from_values(["560001"]).unwrap();
        assert_eq!(tree.root(), keccak256(b"560001"));
        let proof = tree.proof_for_value("560001").unwrap();
        assert!(proof.is_empty());
        assert!(proof.verify(&tree.root()));
    }

    #[test]
    fn test_four_leaf_tree_has_two_step_proofs() {
        let tree = MerkleTree::from_values(MAHARASHTRA).unwrap();
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.depth(), 2);
        for code in MAHARASHTRA {
            let proof = tree.proof_for_value(code).unwrap();
            assert_eq!(proof.len(), 2, "code {code}");
            assert!(proof.verify(&tree.root()), "code {code}");
        }
    }

    #[test]
    fn test_four_leaf_root_matches_manual_construction() {
        let mut leaves: Vec<Bytes32> = MAHARASHTRA.iter().map(keccak256).collect();
        leaves.sort();
        let left = hash_pair_sorted(&leaves[0], &leaves[1]);
        let right = hash_pair_sorted(&leaves[2], &leaves[3]);
        let expected = hash_pair_sorted(&left, &right);
        assert_eq!(MerkleTree::from_values(MAHARASHTRA).unwrap().root(), expected);
    }

    #[test]
    fn test_odd_level_promotes_last_node() {
        let tree = MerkleTree::from_values(["600001", "600002", "600003"]).unwrap();
        assert_eq!(tree.depth(), 2);
        // The promoted leaf has no sibling at the first level.
        let lengths: Vec<usize> = ["600001", "600002", "600003"]
            .iter()
            .map(|c| tree.proof_for_value(c).unwrap().len())
            .collect();
        assert!(lengths.contains(&1));
        assert_eq!(lengths.iter().filter(|l| **l == 2).count(), 2);
        for code in ["600001", "600002", "600003"] {
            assert!(tree.proof_for_value(code).unwrap().verify(&tree.root()));
        }
    }

    #[test]
    fn test_absent_value_has_no_proof() {
        let tree = MerkleTree::from_values(MAHARASHTRA).unwrap();
        assert!(tree.proof_for_value("999999").is_none());
        assert!(!tree.contains(&keccak256(b"999999")));
    }

    #[test]
    fn test_duplicates_collapse() {
        let with_dup = MerkleTree::from_values(["400001", "400001", "400002"]).unwrap();
        let without = MerkleTree::from_values(["400001", "400002"]).unwrap();
        assert_eq!(with_dup.root(), without.root());
        assert_eq!(with_dup.leaf_count(), 2);
    }

    #[test]
    fn test_siblings_verify_like_contract() {
        let tree = MerkleTree::from_values(MAHARASHTRA).unwrap();
        let proof = tree.proof_for_value("400002").unwrap();
        assert!(verify_siblings(&tree.root(), &proof.leaf, &proof.siblings()));
        assert!(!verify_siblings(
            &tree.root(),
            &keccak256(b"999999"),
            &proof.siblings()
        ));
    }

    #[test]
    fn test_tampered_sibling_fails() {
        let tree = MerkleTree::from_values(MAHARASHTRA).unwrap();
        let mut proof = tree.proof_for_value("411001").unwrap();
        proof.path[0].hash = keccak256(b"tampered");
        assert!(!proof.verify(&tree.root()));
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
    }

    proptest! {
        #[test]
        fn prop_root_is_order_independent(
            mut codes in proptest::collection::vec("[0-9]{6}", 1..40),
            seed in any::<u64>(),
        ) {
            let original = MerkleTree::from_values(&codes).unwrap().root();
            // Deterministic shuffle driven by the seed.
            let n = codes.len();
            let mut state = seed;
            for i in (1..n).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state % (i as u64 + 1)) as usize;
                codes.swap(i, j);
            }
            prop_assert_eq!(MerkleTree::from_values(&codes).unwrap().root(), original);
        }

        #[test]
        fn prop_every_member_verifies(codes in proptest::collection::vec("[0-9]{6}", 1..40)) {
            let tree = MerkleTree::from_values(&codes).unwrap();
            for code in &codes {
                let proof = tree.proof_for_value(code).unwrap();
                prop_assert!(proof.verify(&tree.root()));
            }
        }

        #[test]
        fn prop_non_member_has_no_proof(
            codes in proptest::collection::vec("[0-9]{6}", 1..40),
            probe in "[a-z]{6}",
        ) {
            let tree = MerkleTree::from_values(&codes).unwrap();
            prop_assert!(tree.proof_for_value(&probe).is_none());
        }
    }
}
