//! # Canonical Serialization — JCS Byte Production
//!
//! `CanonicalBytes` is the only input accepted by [`crate::sha256_digest`].
//! Its inner buffer is private; the single constructor serializes through
//! `serde_jcs` (RFC 8785: sorted keys, compact separators), so two values
//! that are equal as JSON always produce identical digests regardless of
//! map iteration order.
//!
//! Floats are rejected. Nothing in anonvote hashes a float, and JCS number
//! formatting is the one place where implementations disagree.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the value contains a non-integer number,
    /// `SerializationFailed` if serde cannot represent the value as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sorted_keys_compact_separators() {
        let data = serde_json::json!({"b": ["2"], "a": ["1", "3"]});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"a":["1","3"],"b":["2"]}"#);
    }

    #[test]
    fn test_hashmap_order_does_not_leak() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for (k, v) in [("Karnataka", 3), ("Maharashtra", 4), ("TamilNadu", 3)] {
            first.insert(k, v);
        }
        for (k, v) in [("TamilNadu", 3), ("Karnataka", 3), ("Maharashtra", 4)] {
            second.insert(k, v);
        }
        assert_eq!(
            CanonicalBytes::new(&first).unwrap(),
            CanonicalBytes::new(&second).unwrap()
        );
    }

    #[test]
    fn test_float_rejected() {
        let result = CanonicalBytes::new(&serde_json::json!({"weight": 0.5}));
        assert!(matches!(
            result,
            Err(CanonicalizationError::FloatRejected(f)) if f == 0.5
        ));
    }

    #[test]
    fn test_nested_float_rejected() {
        let data = serde_json::json!({"outer": [{"inner": 1.25}]});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_empty_array() {
        let cb = CanonicalBytes::new(&Vec::<String>::new()).unwrap();
        assert_eq!(cb.as_bytes(), b"[]");
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), 2);
    }
}
