//! # Eligibility List — Static Region Configuration
//!
//! Maps each region name to the ordered list of location codes that may
//! participate. Loaded once at start-up from YAML or JSON:
//!
//! ```yaml
//! Maharashtra: ["400001", "400002", "411001", "411002"]
//! Karnataka: ["560001", "560002", "560003"]
//! ```
//!
//! Order within a region is preserved as written; the Merkle index is
//! insensitive to it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use anonvote_core::{sha256_digest, CanonicalBytes, ContentDigest, Pincode, Region};

use crate::error::EligibilityError;

/// Region name → eligible location codes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EligibilityList {
    regions: BTreeMap<Region, Vec<Pincode>>,
}

impl EligibilityList {
    /// Build from `(region, codes)` pairs, validating every entry.
    pub fn from_pairs<R, C, I>(pairs: impl IntoIterator<Item = (R, I)>) -> Result<Self, EligibilityError>
    where
        R: AsRef<str>,
        C: AsRef<str>,
        I: IntoIterator<Item = C>,
    {
        let mut regions = BTreeMap::new();
        for (region, codes) in pairs {
            let region = Region::new(region)?;
            let codes = codes
                .into_iter()
                .map(Pincode::new)
                .collect::<Result<Vec<_>, _>>()?;
            if codes.is_empty() {
                return Err(EligibilityError::EmptyRegion { region });
            }
            regions.insert(region, codes);
        }
        Ok(Self { regions })
    }

    /// The sample list shipped with the reference deployment.
    pub fn sample() -> Self {
        let regions = [
            ("Maharashtra", &["400001", "400002", "411001", "411002"][..]),
            ("Karnataka", &["560001", "560002", "560003"][..]),
            ("TamilNadu", &["600001", "600002", "600003"][..]),
        ];
        // Literal entries are non-empty, so validation cannot fail.
        Self::from_pairs(regions.iter().map(|(r, c)| (*r, c.iter().copied())))
            .unwrap_or_default()
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, EligibilityError> {
        let content = std::fs::read_to_string(path).map_err(|source| EligibilityError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let raw: BTreeMap<String, Vec<String>> = if is_json {
            serde_json::from_str(&content).map_err(|source| EligibilityError::JsonParse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|source| EligibilityError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?
        };

        Self::from_pairs(raw)
    }

    /// Eligible codes for a region, in configured order.
    pub fn codes(&self, region: &Region) -> Option<&[Pincode]> {
        self.regions.get(region).map(Vec::as_slice)
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.keys()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Content digest of one region's code list, used as the tree cache key.
    pub fn region_digest(&self, region: &Region) -> Option<ContentDigest> {
        let codes = self.regions.get(region)?;
        CanonicalBytes::new(codes).ok().map(|cb| sha256_digest(&cb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sample_has_three_regions() {
        let list = EligibilityList::sample();
        assert_eq!(list.len(), 3);
        let mh = Region::new("Maharashtra").unwrap();
        let codes: Vec<&str> = list.codes(&mh).unwrap().iter().map(Pincode::as_str).collect();
        assert_eq!(codes, ["400001", "400002", "411001", "411002"]);
    }

    #[test]
    fn test_empty_region_rejected() {
        let result = EligibilityList::from_pairs([("Goa", Vec::<&str>::new())]);
        assert!(matches!(result, Err(EligibilityError::EmptyRegion { .. })));
    }

    #[test]
    fn test_blank_code_rejected() {
        let result = EligibilityList::from_pairs([("Goa", vec!["403001", "  "])]);
        assert!(matches!(result, Err(EligibilityError::InvalidEntry(_))));
    }

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "Kerala: [\"682001\", \"682002\"]").unwrap();
        let list = EligibilityList::load(file.path()).unwrap();
        let kerala = Region::new("Kerala").unwrap();
        assert_eq!(list.codes(&kerala).unwrap().len(), 2);
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"Punjab": ["140001"]}}"#).unwrap();
        let list = EligibilityList::load(file.path()).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_load_reports_path_on_parse_failure() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();
        match EligibilityList::load(file.path()) {
            Err(EligibilityError::JsonParse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected JsonParse, got {other:?}"),
        }
    }

    #[test]
    fn test_region_digest_tracks_content() {
        let a = EligibilityList::from_pairs([("Goa", vec!["403001"])]).unwrap();
        let b = EligibilityList::from_pairs([("Goa", vec!["403001", "403002"])]).unwrap();
        let goa = Region::new("Goa").unwrap();
        assert_ne!(a.region_digest(&goa), b.region_digest(&goa));
        assert_eq!(a.region_digest(&goa), a.clone().region_digest(&goa));
    }
}
