//! Common types used across the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Currency code of the ledger's native asset
pub const NATIVE_CURRENCY: &str = "XRP";

/// Drops per XRP
pub const DROPS_PER_XRP: f64 = 1_000_000.0;

/// Normalized asset. The native asset has no issuer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub label: String,
}

impl Asset {
    pub fn native() -> Self {
        Self {
            currency: NATIVE_CURRENCY.to_string(),
            issuer: None,
            label: NATIVE_CURRENCY.to_string(),
        }
    }

    pub fn is_native(&self) -> bool {
        self.issuer.is_none()
    }

    /// Form sent to the node in `amm_info` / `book_offers` requests.
    pub fn to_request_value(&self) -> Value {
        match &self.issuer {
            Some(issuer) => json!({ "currency": self.currency, "issuer": issuer }),
            None => json!({ "currency": self.currency }),
        }
    }

    /// `XRP` or `<label>:<issuer>`
    pub fn display_name(&self) -> String {
        match &self.issuer {
            Some(issuer) => format!("{}:{}", self.label, issuer),
            None => self.label.clone(),
        }
    }
}

/// Ledger amount in its original representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Integer drops
    Native(u64),
    Issued {
        currency: String,
        issuer: String,
        value: String,
    },
}

impl Amount {
    /// Parse a ledger amount: drops arrive as a string (or number), issued
    /// amounts as `{currency, issuer, value}`.
    pub fn from_ledger(value: &Value) -> Option<Self> {
        match value {
            Value::String(drops) => drops.parse().ok().map(Amount::Native),
            Value::Number(drops) => drops.as_u64().map(Amount::Native),
            Value::Object(map) => Some(Amount::Issued {
                currency: map.get("currency")?.as_str()?.to_string(),
                issuer: map.get("issuer")?.as_str()?.to_string(),
                value: map.get("value")?.as_str()?.to_string(),
            }),
            _ => None,
        }
    }

    /// Decimal value: drops are converted to XRP, issued values parsed as-is.
    pub fn to_decimal(&self) -> f64 {
        match self {
            Amount::Native(drops) => *drops as f64 / DROPS_PER_XRP,
            Amount::Issued { value, .. } => value.parse().unwrap_or(0.0),
        }
    }

    pub fn currency(&self) -> &str {
        match self {
            Amount::Native(_) => NATIVE_CURRENCY,
            Amount::Issued { currency, .. } => currency,
        }
    }
}

/// Aggregated order book volume for one side of a pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DexAmount {
    /// Decimal XRP
    Native(f64),
    Issued {
        currency: String,
        issuer: String,
        value: f64,
    },
}

impl DexAmount {
    pub fn for_asset(asset: &Asset, volume: f64) -> Self {
        match &asset.issuer {
            Some(issuer) => DexAmount::Issued {
                currency: asset.currency.clone(),
                issuer: issuer.clone(),
                value: volume,
            },
            None => DexAmount::Native(volume),
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            DexAmount::Native(value) => *value,
            DexAmount::Issued { value, .. } => *value,
        }
    }
}

/// Live AMM pool liquidity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmLiquidity {
    pub amount1: Amount,
    pub amount2: Amount,
    pub ratio: f64,
    pub lp_token_supply: String,
    pub trading_fee_basis_points: u32,
    pub pool_account: String,
}

/// Funded order book liquidity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexLiquidity {
    pub amount1: DexAmount,
    pub amount2: DexAmount,
    pub offer_count: u32,
}

/// Merged view of one trading pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub asset1: Asset,
    pub asset2: Asset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amm: Option<AmmLiquidity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dex: Option<DexLiquidity>,
}

impl PoolRecord {
    pub fn new(asset1: Asset, asset2: Asset) -> Self {
        Self {
            asset1,
            asset2,
            amm: None,
            dex: None,
        }
    }

    pub fn with_amm(mut self, amm: Option<AmmLiquidity>) -> Self {
        self.amm = amm;
        self
    }
}

/// Published result of one completed discovery cycle
#[derive(Debug, Clone, Default, Serialize)]
pub struct PairSnapshot {
    pub cycle: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub pairs: BTreeMap<String, PoolRecord>,
}

impl PairSnapshot {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
