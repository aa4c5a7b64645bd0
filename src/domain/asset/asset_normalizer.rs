//! Normalization of raw ledger asset descriptors

use serde_json::Value;

use crate::shared::errors::DiscoveryError;
use crate::shared::types::{Asset, NATIVE_CURRENCY};

/// Turn a ledger asset descriptor into an [`Asset`].
///
/// The native asset shows up either as a bare string or as an object without
/// an issuer. Issued assets always carry `currency` and `issuer`.
pub fn normalize_asset(raw: &Value) -> Result<Asset, DiscoveryError> {
    match raw {
        Value::String(_) => Ok(Asset::native()),
        Value::Object(map) => {
            let currency = map
                .get("currency")
                .and_then(Value::as_str)
                .ok_or_else(|| DiscoveryError::MalformedEntry(format!("asset without currency: {}", raw)))?;

            match map.get("issuer").and_then(Value::as_str) {
                Some(issuer) => Ok(Asset {
                    currency: currency.to_string(),
                    issuer: Some(issuer.to_string()),
                    label: decode_currency(currency),
                }),
                None if currency == NATIVE_CURRENCY => Ok(Asset::native()),
                None => Err(DiscoveryError::MalformedEntry(format!("issued asset without issuer: {}", raw))),
            }
        }
        other => Err(DiscoveryError::MalformedEntry(format!("unexpected asset shape: {}", other))),
    }
}

/// Human readable label for a currency code.
///
/// Three character codes are used verbatim. Longer codes are 160-bit hex and
/// decode to text with the NUL padding stripped. A trailing odd nibble is
/// ignored; undecodable codes are returned unchanged.
pub fn decode_currency(code: &str) -> String {
    if code.len() == 3 || !code.is_ascii() {
        return code.to_string();
    }

    let even = &code[..code.len() - code.len() % 2];
    match hex::decode(even) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim_end_matches('\0').to_string(),
        Err(_) => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_three_character_code_is_verbatim() {
        assert_eq!(decode_currency("USD"), "USD");
        assert_eq!(decode_currency("xC1"), "xC1");
    }

    #[test]
    fn test_hex_code_strips_null_padding() {
        assert_eq!(decode_currency("5553440000000000000000000000000000000000"), "USD");
        assert_eq!(decode_currency("555344000000000000000000000000000000000"), "USD");
        assert_eq!(decode_currency("534F4C4F00000000000000000000000000000000"), "SOLO");
    }

    #[test]
    fn test_undecodable_code_is_returned_unchanged() {
        assert_eq!(decode_currency("ZZZZ"), "ZZZZ");
    }

    #[test]
    fn test_native_sentinels() {
        assert_eq!(normalize_asset(&json!("XRP")).unwrap(), Asset::native());
        assert_eq!(normalize_asset(&json!({ "currency": "XRP" })).unwrap(), Asset::native());
    }

    #[test]
    fn test_issued_asset() {
        let asset = normalize_asset(&json!({
            "currency": "534F4C4F00000000000000000000000000000000",
            "issuer": "rsoLo2S1kiGeCcn6hCUXVrCpGMWLrRrLZz"
        }))
        .unwrap();
        assert_eq!(asset.label, "SOLO");
        assert_eq!(asset.issuer.as_deref(), Some("rsoLo2S1kiGeCcn6hCUXVrCpGMWLrRrLZz"));
        assert_eq!(asset.currency, "534F4C4F00000000000000000000000000000000");
    }

    #[test]
    fn test_malformed_assets() {
        assert!(normalize_asset(&json!({ "issuer": "rX" })).is_err());
        assert!(normalize_asset(&json!({ "currency": "USD" })).is_err());
        assert!(normalize_asset(&json!(12)).is_err());
    }
}
