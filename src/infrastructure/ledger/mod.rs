//! Request/response access to an XRPL node

pub mod pagination;
pub mod rpc_client;
#[cfg(test)]
pub(crate) mod mock_gateway;

pub use pagination::MarkerPaginator;
pub use rpc_client::{JsonRpcGateway, LedgerGateway};
