//! Pair domain - order-independent pair identity

mod pair_key;

pub use pair_key::{canonical_pair, pair_key, CanonicalPair};
