//! Error handling for the application

use thiserror::Error;

/// Errors reported by the ledger gateway
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("{command} rejected by node: {error}{}", detail(.message))]
    Rpc {
        command: String,
        error: String,
        message: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// True when the node answered with an error payload, as opposed to the
    /// request never completing.
    pub fn is_request_level(&self) -> bool {
        matches!(self, GatewayError::Rpc { .. })
    }
}

fn detail(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(" ({})", m)).unwrap_or_default()
}

/// Discovery errors, split by how far they are allowed to travel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    /// One pool's liquidity could not be fetched; the pool is kept without it.
    #[error("Liquidity fetch failed for {pair}: {reason}")]
    TransientPool { pair: String, reason: String },

    /// A paginated scan was cut short; data from earlier pages is kept.
    #[error("Pagination of {command} stopped: {reason}")]
    Pagination { command: String, reason: String },

    /// The whole cycle is discarded.
    #[error("Discovery cycle aborted: {0}")]
    CycleFatal(GatewayError),

    #[error("Malformed ledger entry: {0}")]
    MalformedEntry(String),
}

impl DiscoveryError {
    /// Classify a gateway failure raised while paginating `command`.
    pub fn from_page(command: &str, err: GatewayError) -> Self {
        if err.is_request_level() {
            DiscoveryError::Pagination {
                command: command.to_string(),
                reason: err.to_string(),
            }
        } else {
            DiscoveryError::CycleFatal(err)
        }
    }
}

impl From<GatewayError> for DiscoveryError {
    fn from(err: GatewayError) -> Self {
        DiscoveryError::CycleFatal(err)
    }
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_level_errors_become_pagination_errors() {
        let err = GatewayError::Rpc {
            command: "book_offers".to_string(),
            error: "srcCurMalformed".to_string(),
            message: None,
        };
        match DiscoveryError::from_page("book_offers", err) {
            DiscoveryError::Pagination { command, .. } => assert_eq!(command, "book_offers"),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_transport_errors_are_cycle_fatal() {
        let err = GatewayError::Transport("connection refused".to_string());
        assert_eq!(
            DiscoveryError::from_page("ledger_data", err.clone()),
            DiscoveryError::CycleFatal(err)
        );
    }

    #[test]
    fn test_rpc_error_display_includes_message() {
        let err = GatewayError::Rpc {
            command: "amm_info".to_string(),
            error: "actNotFound".to_string(),
            message: Some("Account not found.".to_string()),
        };
        assert_eq!(err.to_string(), "amm_info rejected by node: actNotFound (Account not found.)");
    }
}
