//! JSON-RPC client for an XRPL node

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::shared::errors::GatewayError;

/// Request/response access to the ledger.
///
/// Implementations return the `result` object of a successful call and
/// report error payloads as [`GatewayError::Rpc`].
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    async fn request(&self, command: &str, params: Value) -> Result<Value, GatewayError>;
}

/// XRPL node reached over JSON-RPC/HTTP
pub struct JsonRpcGateway {
    http_client: Client,
    url: String,
    timeout: Duration,
}

impl JsonRpcGateway {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            url,
            timeout,
        }
    }

    async fn post(&self, body: &Value) -> Result<Value, GatewayError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Transport(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LedgerGateway for JsonRpcGateway {
    async fn request(&self, command: &str, params: Value) -> Result<Value, GatewayError> {
        let body = json!({ "method": command, "params": [params] });
        debug!("➡️ {} {}", command, body["params"][0]);

        let envelope = tokio::time::timeout(self.timeout, self.post(&body))
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout.as_secs()))??;

        unwrap_result(command, envelope)
    }
}

/// Extract `result` from a JSON-RPC envelope, surfacing error payloads.
pub(crate) fn unwrap_result(command: &str, mut envelope: Value) -> Result<Value, GatewayError> {
    let result = match envelope.get_mut("result") {
        Some(result) => result.take(),
        None => {
            return Err(GatewayError::InvalidResponse(format!(
                "{} response without result",
                command
            )))
        }
    };

    if let Some(error) = result.get("error") {
        return Err(GatewayError::Rpc {
            command: command.to_string(),
            error: error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string()),
            message: result
                .get("error_message")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_success() {
        let envelope = json!({ "result": { "state": [], "status": "success" } });
        let result = unwrap_result("ledger_data", envelope).unwrap();
        assert_eq!(result["status"], "success");
    }

    #[test]
    fn test_unwrap_error_payload() {
        let envelope = json!({
            "result": {
                "error": "actNotFound",
                "error_message": "Account not found.",
                "status": "error"
            }
        });
        let err = unwrap_result("amm_info", envelope).unwrap_err();
        assert_eq!(
            err,
            GatewayError::Rpc {
                command: "amm_info".to_string(),
                error: "actNotFound".to_string(),
                message: Some("Account not found.".to_string()),
            }
        );
    }

    #[test]
    fn test_unwrap_missing_result() {
        let err = unwrap_result("book_offers", json!({ "id": 1 })).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let gateway = JsonRpcGateway::new("http://127.0.0.1:9/".to_string(), Duration::from_secs(5));
        let err = gateway.request("server_info", json!({})).await.unwrap_err();
        assert!(!err.is_request_level());
    }
}
