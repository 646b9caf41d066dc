//! # Eligibility Index
//!
//! Answers "is this pincode eligible in this region?" with a Merkle
//! inclusion proof that the contract can check against a published root,
//! without the full list ever going on-chain.
//!
//! Trees are built on first use and cached per region. Each cache entry is
//! keyed by the content digest of the region's code list; a lookup whose
//! digest no longer matches (after [`EligibilityIndex::reload`]) rebuilds
//! the tree.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use anonvote_core::{Bytes32, ContentDigest, Region};
use anonvote_crypto::{MerkleProof, MerkleTree};

use crate::error::{EligibilityError, NotEligible, NotEligibleReason};
use crate::list::EligibilityList;

#[derive(Debug, Clone)]
struct CachedTree {
    digest: ContentDigest,
    tree: Arc<MerkleTree>,
}

/// Per-region Merkle index over an [`EligibilityList`].
#[derive(Debug)]
pub struct EligibilityIndex {
    list: RwLock<Arc<EligibilityList>>,
    cache: RwLock<HashMap<Region, CachedTree>>,
}

impl EligibilityIndex {
    pub fn new(list: EligibilityList) -> Self {
        Self {
            list: RwLock::new(Arc::new(list)),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of the current list.
    pub fn list(&self) -> Arc<EligibilityList> {
        Arc::clone(&self.list.read())
    }

    /// Replace the list. Cached trees for regions whose codes changed are
    /// rebuilt on next use; unchanged regions keep their cached tree.
    pub fn reload(&self, list: EligibilityList) {
        *self.list.write() = Arc::new(list);
        tracing::info!("eligibility list reloaded");
    }

    /// Build (or fetch from cache) the tree for a region and return its root.
    ///
    /// Deterministic: the same code set always yields the same root.
    pub fn build_tree(&self, region: &Region) -> Result<Bytes32, EligibilityError> {
        self.tree(region).map(|tree| tree.root())
    }

    /// Prove that `code` is eligible in `region`.
    ///
    /// Inputs are raw strings because they come straight from a revealed
    /// profile; blank values are simply not eligible.
    pub fn prove_inclusion(&self, region: &str, code: &str) -> Result<MerkleProof, NotEligible> {
        let not_eligible = |reason, valid_codes| NotEligible {
            region: region.to_string(),
            pincode: code.to_string(),
            reason,
            valid_codes,
        };

        let Ok(region_id) = Region::new(region) else {
            return Err(not_eligible(NotEligibleReason::UnknownRegion, Vec::new()));
        };
        let list = self.list();
        let Some(codes) = list.codes(&region_id) else {
            tracing::debug!(region, "eligibility lookup for unknown region");
            return Err(not_eligible(NotEligibleReason::UnknownRegion, Vec::new()));
        };

        let code = code.trim();
        let listed = codes.iter().any(|c| c.as_str() == code);
        let tree = if listed { self.tree(&region_id).ok() } else { None };
        match tree.and_then(|t| t.proof_for_value(code)) {
            Some(proof) => Ok(proof),
            None => {
                tracing::debug!(region, pincode = code, "pincode not in eligibility list");
                Err(not_eligible(NotEligibleReason::NotListed, codes.to_vec()))
            }
        }
    }

    fn tree(&self, region: &Region) -> Result<Arc<MerkleTree>, EligibilityError> {
        let list = self.list();
        let (codes, digest) = match (list.codes(region), list.region_digest(region)) {
            (Some(codes), Some(digest)) => (codes, digest),
            _ => {
                return Err(EligibilityError::UnknownRegion {
                    region: region.to_string(),
                })
            }
        };

        if let Some(cached) = self.cache.read().get(region) {
            if cached.digest == digest {
                return Ok(Arc::clone(&cached.tree));
            }
        }

        let tree = MerkleTree::from_values(codes.iter().map(|c| c.as_str()))
            .map_err(|_| EligibilityError::EmptyRegion {
                region: region.clone(),
            })?;
        let tree = Arc::new(tree);
        tracing::debug!(
            region = %region,
            leaves = tree.leaf_count(),
            root = %tree.root(),
            "built eligibility tree"
        );
        self.cache.write().insert(
            region.clone(),
            CachedTree {
                digest,
                tree: Arc::clone(&tree),
            },
        );
        Ok(tree)
    }
}
