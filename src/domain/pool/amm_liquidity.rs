//! Live liquidity of a single AMM pool

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::infrastructure::ledger::LedgerGateway;
use crate::shared::errors::DiscoveryError;
use crate::shared::types::{AmmLiquidity, Amount, Asset};

/// Queries `amm_info` for one pool
pub struct AmmLiquidityFetcher {
    gateway: Arc<dyn LedgerGateway>,
}

impl AmmLiquidityFetcher {
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch the pool's reserves, LP supply and fee.
    ///
    /// Every failure is reported as [`DiscoveryError::TransientPool`]; the
    /// caller keeps the pair without AMM data.
    pub async fn fetch(
        &self,
        asset1: &Asset,
        asset2: &Asset,
        pool_account: &str,
    ) -> Result<AmmLiquidity, DiscoveryError> {
        let pair = format!("{}/{}", asset1.display_name(), asset2.display_name());
        let transient = |reason: String| DiscoveryError::TransientPool {
            pair: pair.clone(),
            reason,
        };

        let params = json!({
            "asset": asset1.to_request_value(),
            "asset2": asset2.to_request_value(),
        });
        let result = self
            .gateway
            .request("amm_info", params)
            .await
            .map_err(|e| transient(e.to_string()))?;

        let amm = result
            .get("amm")
            .ok_or_else(|| transient("response without amm".to_string()))?;
        let amount1 = Amount::from_ledger(&amm["amount"])
            .ok_or_else(|| transient(format!("unreadable amount {}", amm["amount"])))?;
        let amount2 = Amount::from_ledger(&amm["amount2"])
            .ok_or_else(|| transient(format!("unreadable amount2 {}", amm["amount2"])))?;

        let ratio = price_ratio(&amount1, &amount2);
        debug!("💧 {} ratio {}", pair, ratio);

        Ok(AmmLiquidity {
            amount1,
            amount2,
            ratio,
            lp_token_supply: amm["lp_token"]["value"].as_str().unwrap_or("0").to_string(),
            trading_fee_basis_points: trading_fee(&amm["trading_fee"]),
            pool_account: pool_account.to_string(),
        })
    }
}

/// Fee in basis points; absent or out-of-range values read as zero.
fn trading_fee(value: &Value) -> u32 {
    value.as_u64().and_then(|fee| u32::try_from(fee).ok()).unwrap_or(0)
}

/// `amount2 / amount1` in decimal units; zero for an empty first side.
pub fn price_ratio(amount1: &Amount, amount2: &Amount) -> f64 {
    let base = amount1.to_decimal();
    if base > 0.0 {
        amount2.to_decimal() / base
    } else {
        0.0
    }
}
