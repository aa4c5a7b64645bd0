// src/report.rs
use crate::domain::asset::decode_currency;
use crate::shared::types::{Amount, DexAmount, PairSnapshot, PoolRecord, NATIVE_CURRENCY};
use crate::shared::utils::format_amount;

/// Human readable lines for every pair that has order book data.
///
/// AMM-only pairs are left out of the narration but stay in the snapshot.
pub fn narrate(snapshot: &PairSnapshot) -> Vec<String> {
    snapshot
        .pairs
        .values()
        .filter(|record| record.dex.is_some())
        .flat_map(describe_pair)
        .collect()
}

pub fn describe_pair(record: &PoolRecord) -> Vec<String> {
    let mut lines = vec![format!(
        "{}/{}",
        record.asset1.display_name(),
        record.asset2.display_name()
    )];

    if let Some(amm) = &record.amm {
        lines.push(format!("  Pool: {}", amm.pool_account));
        lines.push(format!(
            "  AMM Liquidity: {}, {}",
            describe_amount(&amm.amount1),
            describe_amount(&amm.amount2)
        ));
        lines.push(format!("  Ratio AMM {}", amm.ratio));
        lines.push(format!("  LP Token Supply: {}", amm.lp_token_supply));
        lines.push(format!("  Trading Fee: {}", amm.trading_fee_basis_points));
    }

    if let Some(dex) = &record.dex {
        lines.push(format!(
            "  DEX Liquidity: {}, {}",
            describe_dex_amount(&dex.amount1),
            describe_dex_amount(&dex.amount2)
        ));
        lines.push(format!("  Offers: {}", dex.offer_count));
    }

    lines
}

fn describe_amount(amount: &Amount) -> String {
    format!(
        "{} {}",
        format_amount(amount.to_decimal()),
        decode_currency(amount.currency())
    )
}

fn describe_dex_amount(amount: &DexAmount) -> String {
    let currency = match amount {
        DexAmount::Native(_) => NATIVE_CURRENCY.to_string(),
        DexAmount::Issued { currency, .. } => decode_currency(currency),
    };
    format!("{} {}", format_amount(amount.value()), currency)
}

/// Pretty JSON of the pair map, as served by the read API.
pub fn to_json(snapshot: &PairSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&snapshot.pairs)
}
