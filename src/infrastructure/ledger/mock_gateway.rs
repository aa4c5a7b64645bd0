//! Scripted gateway for tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::rpc_client::LedgerGateway;
use crate::shared::errors::GatewayError;

/// Replays queued responses per command and records every request.
///
/// A command with an empty queue answers with a `noScript` error
/// payload, which paginated scans treat as end of data.
#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, GatewayError>>>>,
    calls: Mutex<Vec<(String, Value)>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request sleeps for `latency` before answering.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Highest number of requests observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn push(&self, command: &str, response: Result<Value, GatewayError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn push_ok(&self, command: &str, result: Value) {
        self.push(command, Ok(result));
    }

    pub fn push_err(&self, command: &str, err: GatewayError) {
        self.push(command, Err(err));
    }

    pub fn push_rpc_error(&self, command: &str, error: &str) {
        self.push_err(
            command,
            GatewayError::Rpc {
                command: command.to_string(),
                error: error.to_string(),
                message: None,
            },
        );
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, command: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(c, _)| c == command)
            .map(|(_, params)| params)
            .collect()
    }
}

#[async_trait]
impl LedgerGateway for MockGateway {
    async fn request(&self, command: &str, params: Value) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push((command.to_string(), params));

        if let Some(latency) = self.latency {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            tokio::time::sleep(latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        self.responses
            .lock()
            .unwrap()
            .get_mut(command)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(GatewayError::Rpc {
                    command: command.to_string(),
                    error: "noScript".to_string(),
                    message: None,
                })
            })
    }
}
