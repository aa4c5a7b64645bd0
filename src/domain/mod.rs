//! Domain layer - pair discovery and aggregation

pub mod asset;
pub mod dex;
pub mod pair;
pub mod pool;
