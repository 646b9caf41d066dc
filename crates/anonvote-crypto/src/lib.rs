//! # anonvote-crypto — Cryptographic Primitives
//!
//! - **Keccak-256** (`keccak.rs`), the hash the voting contract uses for
//!   Merkle leaves and nodes.
//! - **Sorted-pair Merkle tree** (`merkle.rs`) for eligibility inclusion
//!   proofs. Verification matches the on-chain sorted-pair check, so a
//!   proof built here verifies in the contract against the same root.
//!
//! ## Crate Policy
//!
//! - Depends only on `anonvote-core` internally.
//! - No mocking of hashing in tests; every test uses real keccak-256.

pub mod keccak;
pub mod merkle;

pub use keccak::{hash_pair_sorted, keccak256};
pub use merkle::{verify_siblings, MerkleError, MerkleProof, MerkleTree, PathStep, Side};
