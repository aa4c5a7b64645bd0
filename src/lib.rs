//! xrpl-pools - XRPL AMM and order book liquidity discovery
//! Built with Domain-Driven Design principles

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use application::{DiscoveryService, RefreshScheduler, SchedulerHandle};
pub use domain::pair::pair_key;
pub use domain::pool::PairStore;
pub use infrastructure::ledger::{JsonRpcGateway, LedgerGateway};
