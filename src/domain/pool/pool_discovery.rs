//! AMM pool discovery over the ledger state index

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::amm_liquidity::AmmLiquidityFetcher;
use super::pool_store::PairStore;
use crate::domain::asset::normalize_asset;
use crate::domain::dex::OrderBookScanner;
use crate::domain::pair::canonical_pair;
use crate::infrastructure::ledger::{LedgerGateway, MarkerPaginator};
use crate::shared::errors::DiscoveryError;
use crate::shared::types::PoolRecord;

/// Counters for one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    pub pages: usize,
    pub entries: usize,
    pub pairs: usize,
    pub with_amm: usize,
    pub with_dex: usize,
    pub skipped: usize,
}

/// Walks every AMM object in the validated ledger and fills a [`PairStore`]
pub struct AmmPoolScanner {
    gateway: Arc<dyn LedgerGateway>,
    liquidity: AmmLiquidityFetcher,
    books: OrderBookScanner,
    page_limit: u32,
}

impl AmmPoolScanner {
    pub fn new(gateway: Arc<dyn LedgerGateway>, taker: String, page_limit: u32) -> Self {
        Self {
            liquidity: AmmLiquidityFetcher::new(Arc::clone(&gateway)),
            books: OrderBookScanner::new(Arc::clone(&gateway), taker, page_limit),
            gateway,
            page_limit,
        }
    }

    /// Scan all pools into the store's working map.
    ///
    /// Per pool: liquidity fetch, then the matching order book. A node error
    /// on a `ledger_data` page ends the scan early without failing it.
    pub async fn scan(&self, store: &PairStore) -> Result<ScanSummary, DiscoveryError> {
        info!("🔍 Scanning AMM pools...");
        let params = json!({
            "ledger_index": "validated",
            "type": "amm",
            "limit": self.page_limit,
            "binary": false,
        });
        let mut paginator = MarkerPaginator::new("ledger_data", params);
        let mut summary = ScanSummary::default();

        loop {
            let page = match paginator.next_page(self.gateway.as_ref()).await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(err @ DiscoveryError::Pagination { .. }) => {
                    warn!("⚠️ {}", err);
                    break;
                }
                Err(err) => return Err(err),
            };

            let entries = page["state"].as_array().map(Vec::as_slice).unwrap_or_default();
            for entry in entries {
                summary.entries += 1;
                self.process_entry(entry, store, &mut summary).await?;
            }

            summary.pages = paginator.pages();
            info!("📄 Processed {} AMM entries...", summary.entries);
        }

        Ok(summary)
    }

    async fn process_entry(
        &self,
        entry: &Value,
        store: &PairStore,
        summary: &mut ScanSummary,
    ) -> Result<(), DiscoveryError> {
        let (asset_a, asset_b) = match (normalize_asset(&entry["Asset"]), normalize_asset(&entry["Asset2"])) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(err), _) | (_, Err(err)) => {
                warn!("⚠️ Skipping AMM entry {}: {}", entry["index"], err);
                summary.skipped += 1;
                return Ok(());
            }
        };

        let pair = canonical_pair(&asset_a, &asset_b);
        if !store.mark_seen(&pair.key).await {
            return Ok(());
        }

        let pool_account = entry["Account"].as_str().unwrap_or_default();
        let amm = match self.liquidity.fetch(&pair.asset1, &pair.asset2, pool_account).await {
            Ok(liquidity) => {
                summary.with_amm += 1;
                Some(liquidity)
            }
            Err(err) => {
                warn!("⚠️ {} (pool {})", err, pool_account);
                None
            }
        };

        store
            .upsert(&pair.key, PoolRecord::new(pair.asset1, pair.asset2).with_amm(amm))
            .await;
        summary.pairs += 1;

        if let Some(dex) = self.books.scan(&asset_a, &asset_b).await? {
            store.attach_dex(&pair.key, dex).await;
            summary.with_dex += 1;
        }

        Ok(())
    }
}
