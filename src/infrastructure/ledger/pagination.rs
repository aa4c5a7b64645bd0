//! Marker-driven pagination shared by `ledger_data` and `book_offers`

use serde_json::Value;

use super::rpc_client::LedgerGateway;
use crate::shared::errors::DiscoveryError;

/// Walks a paginated command by following the `marker` field of each response.
pub struct MarkerPaginator {
    command: String,
    params: Value,
    marker: Option<Value>,
    exhausted: bool,
    pages: usize,
}

impl MarkerPaginator {
    pub fn new(command: &str, params: Value) -> Self {
        Self {
            command: command.to_string(),
            params,
            marker: None,
            exhausted: false,
            pages: 0,
        }
    }

    /// Pages fetched so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once a response without a marker has been consumed.
    /// A node-reported error ends the walk with [`DiscoveryError::Pagination`];
    /// anything else is [`DiscoveryError::CycleFatal`].
    pub async fn next_page(
        &mut self,
        gateway: &dyn LedgerGateway,
    ) -> Result<Option<Value>, DiscoveryError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut params = self.params.clone();
        if let (Some(marker), Some(map)) = (&self.marker, params.as_object_mut()) {
            map.insert("marker".to_string(), marker.clone());
        }

        let page = match gateway.request(&self.command, params).await {
            Ok(page) => page,
            Err(err) => {
                self.exhausted = true;
                return Err(DiscoveryError::from_page(&self.command, err));
            }
        };

        self.pages += 1;
        self.marker = page.get("marker").filter(|m| !m.is_null()).cloned();
        if self.marker.is_none() {
            self.exhausted = true;
        }

        Ok(Some(page))
    }
}
