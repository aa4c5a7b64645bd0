//! Pool domain - AMM discovery and the pair store

mod amm_liquidity;
mod pool_discovery;
mod pool_store;

pub use amm_liquidity::{price_ratio, AmmLiquidityFetcher};
pub use pool_discovery::{AmmPoolScanner, ScanSummary};
pub use pool_store::PairStore;
