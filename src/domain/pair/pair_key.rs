//! Canonical ordering and content hash for asset pairs

use sha2::{Digest, Sha256};
use std::cmp::Ordering;

use crate::shared::types::Asset;
use crate::shared::utils::canonical_json;

/// A pair in canonical order together with its key
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPair {
    pub asset1: Asset,
    pub asset2: Asset,
    pub key: String,
}

/// Orders assets by the key-sorted JSON of their ledger form.
fn compare_assets(a: &Asset, b: &Asset) -> Ordering {
    canonical_json(&a.to_request_value()).cmp(&canonical_json(&b.to_request_value()))
}

/// Canonicalize the pair `(a, b)`; the result does not depend on argument order.
pub fn canonical_pair(a: &Asset, b: &Asset) -> CanonicalPair {
    let (asset1, asset2) = match compare_assets(a, b) {
        Ordering::Greater => (b.clone(), a.clone()),
        _ => (a.clone(), b.clone()),
    };
    let key = hash_pair(&asset1, &asset2);
    CanonicalPair { asset1, asset2, key }
}

/// Stable identifier for the pair `(a, b)`, independent of argument order.
pub fn pair_key(a: &Asset, b: &Asset) -> String {
    canonical_pair(a, b).key
}

fn hash_pair(asset1: &Asset, asset2: &Asset) -> String {
    // Labels are part of the serialized assets, so they are hashed too.
    let pair = serde_json::json!([asset1, asset2]);
    let digest = Sha256::digest(canonical_json(&pair).as_bytes());
    hex::encode(digest)
}
