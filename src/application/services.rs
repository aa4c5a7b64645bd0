//! Application services - one discovery cycle

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, Instrument};

use crate::domain::pool::{AmmPoolScanner, PairStore, ScanSummary};
use crate::infrastructure::ledger::LedgerGateway;
use crate::report;
use crate::shared::errors::DiscoveryError;
use crate::shared::utils::generate_id;

/// Outcome of a published cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub summary: ScanSummary,
    pub pairs: usize,
    pub elapsed: Duration,
}

/// Runs discovery cycles against one gateway and publishes into one store
pub struct DiscoveryService {
    scanner: AmmPoolScanner,
    store: Arc<PairStore>,
}

impl DiscoveryService {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        store: Arc<PairStore>,
        taker_account: String,
        page_limit: u32,
    ) -> Self {
        Self {
            scanner: AmmPoolScanner::new(gateway, taker_account, page_limit),
            store,
        }
    }

    pub fn store(&self) -> Arc<PairStore> {
        Arc::clone(&self.store)
    }

    /// Rebuild the pair map from scratch and publish it.
    ///
    /// On error nothing is published and the previous snapshot stays visible.
    pub async fn run_cycle(&self) -> Result<CycleReport, DiscoveryError> {
        let span = info_span!("cycle", id = %generate_id());
        async {
            let started = Instant::now();
            let cycle = self.store.begin_cycle().await;
            info!("🔄 Discovering all pairs from XRPL (cycle {})", cycle);

            let summary = self.scanner.scan(&self.store).await?;
            let snapshot = self.store.publish().await;

            for line in report::narrate(&snapshot) {
                debug!("{}", line);
            }

            let report = CycleReport {
                cycle,
                pairs: snapshot.len(),
                summary,
                elapsed: started.elapsed(),
            };
            info!(
                "✅ Cycle {} published {} pairs ({} with AMM data, {} with DEX data) in {:?}",
                report.cycle, report.pairs, report.summary.with_amm, report.summary.with_dex, report.elapsed
            );
            Ok::<_, DiscoveryError>(report)
        }
        .instrument(span)
        .await
    }
}
