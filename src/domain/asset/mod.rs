//! Asset domain - canonical asset shapes and currency labels

mod asset_normalizer;

pub use asset_normalizer::{decode_currency, normalize_asset};
