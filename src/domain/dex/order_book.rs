//! Funded order book volume for one asset pair

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::infrastructure::ledger::{LedgerGateway, MarkerPaginator};
use crate::shared::errors::DiscoveryError;
use crate::shared::types::{Amount, Asset, DexAmount, DexLiquidity};

/// Running totals across `book_offers` pages
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookTotals {
    /// Offers returned by the node, funded or not
    pub offers_seen: u32,
    pub funded_offers: u32,
    /// Sum of `TakerGets` over funded offers, decimal units
    pub gets_volume: f64,
    /// Sum of `TakerPays` over funded offers, decimal units
    pub pays_volume: f64,
}

impl BookTotals {
    /// Fold one page of offers into the totals. Offers without
    /// `taker_pays_funded` are counted as seen but add no volume.
    pub fn add_page(&mut self, offers: &[Value]) {
        for offer in offers {
            self.offers_seen += 1;
            if offer.get("taker_pays_funded").is_none() {
                continue;
            }
            self.funded_offers += 1;
            self.gets_volume += offer_side(offer, "TakerGets");
            self.pays_volume += offer_side(offer, "TakerPays");
        }
    }

    /// `amount1` is the volume of the paid asset, `amount2` of the asset got.
    pub fn into_liquidity(self, taker_gets: &Asset, taker_pays: &Asset) -> Option<DexLiquidity> {
        if self.offers_seen == 0 {
            return None;
        }
        Some(DexLiquidity {
            amount1: DexAmount::for_asset(taker_pays, self.pays_volume),
            amount2: DexAmount::for_asset(taker_gets, self.gets_volume),
            offer_count: self.funded_offers,
        })
    }
}

fn offer_side(offer: &Value, field: &str) -> f64 {
    offer
        .get(field)
        .and_then(Amount::from_ledger)
        .map(|amount| amount.to_decimal())
        .unwrap_or(0.0)
}

/// Walks `book_offers` for a pair
pub struct OrderBookScanner {
    gateway: Arc<dyn LedgerGateway>,
    taker: String,
    page_limit: u32,
}

impl OrderBookScanner {
    pub fn new(gateway: Arc<dyn LedgerGateway>, taker: String, page_limit: u32) -> Self {
        Self {
            gateway,
            taker,
            page_limit,
        }
    }

    /// Aggregate funded offers selling `taker_gets` for `taker_pays`.
    ///
    /// Returns `Ok(None)` when the book is empty. A node-reported error keeps
    /// whatever earlier pages produced; only cycle-fatal errors are returned.
    pub async fn scan(
        &self,
        taker_gets: &Asset,
        taker_pays: &Asset,
    ) -> Result<Option<DexLiquidity>, DiscoveryError> {
        let params = json!({
            "ledger_index": "validated",
            "taker": self.taker,
            "taker_gets": taker_gets.to_request_value(),
            "taker_pays": taker_pays.to_request_value(),
            "limit": self.page_limit,
            "binary": false,
        });
        let mut paginator = MarkerPaginator::new("book_offers", params);
        let mut totals = BookTotals::default();

        loop {
            let page = match paginator.next_page(self.gateway.as_ref()).await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(err @ DiscoveryError::Pagination { .. }) => {
                    warn!("⚠️ {}/{}: {}", taker_gets.display_name(), taker_pays.display_name(), err);
                    break;
                }
                Err(err) => return Err(err),
            };

            let offers = page["offers"].as_array().map(Vec::as_slice).unwrap_or_default();
            totals.add_page(offers);
            debug!(
                "📖 Processed {} offer entries ({} funded) for {}/{}",
                totals.offers_seen,
                totals.funded_offers,
                taker_gets.display_name(),
                taker_pays.display_name()
            );
        }

        Ok(totals.into_liquidity(taker_gets, taker_pays))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ledger::mock_gateway::MockGateway;
    use crate::shared::errors::GatewayError;

    const ISSUER: &str = "rhub8VRN55s94qWKDv6jmDy1pUykJzF3wq";

    fn usd() -> Asset {
        Asset {
            currency: "USD".to_string(),
            issuer: Some(ISSUER.to_string()),
            label: "USD".to_string(),
        }
    }

    fn offer(drops: &str, usd: &str, funded: bool) -> Value {
        let mut offer = json!({
            "Account": "rMaker",
            "TakerGets": drops,
            "TakerPays": { "currency": "USD", "issuer": ISSUER, "value": usd },
        });
        if funded {
            offer["taker_pays_funded"] = json!({ "currency": "USD", "issuer": ISSUER, "value": usd });
        }
        offer
    }

    fn scanner(gateway: Arc<MockGateway>) -> OrderBookScanner {
        OrderBookScanner::new(gateway, "rTaker".to_string(), 1000)
    }

    #[tokio::test]
    async fn test_sums_funded_offers_across_pages() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_ok("book_offers", json!({
            "offers": [offer("1000000", "0.5", true), offer("2000000", "1", true)],
            "marker": "next"
        }));
        gateway.push_ok("book_offers", json!({ "offers": [offer("3000000", "1.5", true)] }));

        let dex = scanner(gateway.clone())
            .scan(&Asset::native(), &usd())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(dex.offer_count, 3);
        assert_eq!(dex.amount2, DexAmount::Native(6.0));
        assert_eq!(
            dex.amount1,
            DexAmount::Issued { currency: "USD".to_string(), issuer: ISSUER.to_string(), value: 3.0 }
        );

        let calls = gateway.calls_for("book_offers");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0]["taker"], "rTaker");
        assert_eq!(calls[0]["taker_gets"], json!({ "currency": "XRP" }));
        assert_eq!(calls[0]["ledger_index"], "validated");
        assert_eq!(calls[1]["marker"], "next");
    }

    #[tokio::test]
    async fn test_unfunded_offers_add_nothing_but_do_not_stop() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_ok("book_offers", json!({
            "offers": [offer("1000000", "0.5", false)],
            "marker": "next"
        }));
        gateway.push_ok("book_offers", json!({ "offers": [offer("4000000", "2", true)] }));

        let dex = scanner(gateway.clone()).scan(&Asset::native(), &usd()).await.unwrap().unwrap();

        assert_eq!(gateway.calls_for("book_offers").len(), 2);
        assert_eq!(dex.offer_count, 1);
        assert_eq!(dex.amount2.value(), 4.0);
        assert_eq!(dex.amount1.value(), 2.0);
    }

    #[tokio::test]
    async fn test_empty_book_has_no_liquidity() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_ok("book_offers", json!({ "offers": [] }));

        let dex = scanner(gateway).scan(&Asset::native(), &usd()).await.unwrap();
        assert!(dex.is_none());
    }

    #[tokio::test]
    async fn test_error_page_keeps_partial_totals() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_ok("book_offers", json!({ "offers": [offer("1000000", "0.5", true)], "marker": "m" }));
        gateway.push_rpc_error("book_offers", "lgrNotFound");
        gateway.push_ok("book_offers", json!({ "offers": [offer("9000000", "9", true)] }));

        let dex = scanner(gateway.clone()).scan(&Asset::native(), &usd()).await.unwrap().unwrap();

        assert_eq!(gateway.calls_for("book_offers").len(), 2);
        assert_eq!(dex.offer_count, 1);
        assert_eq!(dex.amount2.value(), 1.0);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_err("book_offers", GatewayError::Timeout(30));

        let err = scanner(gateway).scan(&Asset::native(), &usd()).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::CycleFatal(GatewayError::Timeout(30))));
    }

    #[test]
    fn test_book_totals_only_unfunded() {
        let mut totals = BookTotals::default();
        totals.add_page(&[offer("1000000", "1", false), offer("1000000", "1", false)]);
        let dex = totals.into_liquidity(&Asset::native(), &usd()).unwrap();
        assert_eq!(dex.offer_count, 0);
        assert_eq!(dex.amount1.value(), 0.0);
        assert_eq!(dex.amount2.value(), 0.0);
    }
}
