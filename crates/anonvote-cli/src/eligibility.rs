//! # Eligibility Subcommands
//!
//! `root` prints the Merkle root of each region (or one region); `prove`
//! prints the sibling path for a pincode and checks it against the root.

use clap::Args;
use serde::Serialize;

use anonvote_core::{Bytes32, Region};
use anonvote_eligibility::{EligibilityError, EligibilityIndex};

/// Arguments for the root subcommand.
#[derive(Args, Debug)]
pub struct RootArgs {
    /// Only this region.
    #[arg(long)]
    pub region: Option<String>,
}

/// Arguments for the prove subcommand.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Region name as revealed by the identity proof.
    #[arg(long)]
    pub region: String,

    /// Location code to prove.
    #[arg(long)]
    pub pincode: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RegionRoot {
    pub region: String,
    pub codes: usize,
    pub root: Bytes32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InclusionOutput {
    pub region: String,
    pub pincode: String,
    pub root: Bytes32,
    pub siblings: Vec<Bytes32>,
    pub verified: bool,
}

/// A region named on the command line; blank names are unknown regions.
fn region_arg(name: &str) -> Result<Region, EligibilityError> {
    Region::new(name).map_err(|_| EligibilityError::UnknownRegion {
        region: name.to_string(),
    })
}

pub fn roots(index: &EligibilityIndex, args: &RootArgs) -> anyhow::Result<Vec<RegionRoot>> {
    let list = index.list();
    let regions: Vec<Region> = match &args.region {
        Some(name) => vec![region_arg(name)?],
        None => list.regions().cloned().collect(),
    };
    regions
        .into_iter()
        .map(|region| {
            let root = index.build_tree(&region)?;
            Ok::<_, anyhow::Error>(RegionRoot {
                codes: list.codes(&region).map_or(0, <[_]>::len),
                region: region.as_str().to_string(),
                root,
            })
        })
        .collect()
}

pub fn prove(index: &EligibilityIndex, args: &ProveArgs) -> anyhow::Result<InclusionOutput> {
    let proof = index.prove_inclusion(&args.region, &args.pincode)?;
    let root = index.build_tree(&region_arg(&args.region)?)?;
    Ok(InclusionOutput {
        region: args.region.clone(),
        pincode: args.pincode.clone(),
        root,
        siblings: proof.siblings(),
        verified: proof.verify(&root),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anonvote_eligibility::EligibilityList;

    #[test]
    fn test_roots_cover_every_region() {
        let index = EligibilityIndex::new(EligibilityList::sample());
        let roots = roots(&index, &RootArgs { region: None }).unwrap();
        assert_eq!(roots.len(), 3);
        assert!(roots.iter().any(|r| r.region == "Maharashtra" && r.codes == 4));
    }

    #[test]
    fn test_blank_region_is_eligibility_error() {
        let index = EligibilityIndex::new(EligibilityList::sample());
        let err = roots(&index, &RootArgs { region: Some("  ".into()) }).unwrap_err();
        assert_eq!(crate::exit::exit_code(&err), 5);
        let err = prove(
            &index,
            &ProveArgs {
                region: String::new(),
                pincode: "400001".into(),
            },
        )
        .unwrap_err();
        assert_eq!(crate::exit::exit_code(&err), 5);
    }

    #[test]
    fn test_prove_member() {
        let index = EligibilityIndex::new(EligibilityList::sample());
        let out = prove(
            &index,
            &ProveArgs {
                region: "Maharashtra".into(),
                pincode: "411001".into(),
            },
        )
        .unwrap();
        assert!(out.verified);
        assert_eq!(out.siblings.len(), 2);
    }

    #[test]
    fn test_prove_non_member_is_eligibility_error() {
        let index = EligibilityIndex::new(EligibilityList::sample());
        let err = prove(
            &index,
            &ProveArgs {
                region: "Karnataka".into(),
                pincode: "400001".into(),
            },
        )
        .unwrap_err();
        assert_eq!(crate::exit::exit_code(&err), 5);
    }
}
