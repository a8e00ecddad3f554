//! Crypto asset catalog records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog row per tradable symbol.
///
/// Populated by seed data and admin upserts; the live Bitcoin feed is never
/// written back into this table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CryptoAsset {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_price: Decimal,
    pub change_24h: f64,
    #[serde(with = "rust_decimal::serde::str")]
    pub market_cap: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub volume_24h: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for the asset catalog, keyed by symbol.
#[derive(Debug, Clone)]
pub struct NewCryptoAsset {
    pub symbol: String,
    pub name: String,
    pub current_price: Decimal,
    pub change_24h: f64,
    pub market_cap: Decimal,
    pub volume_24h: Decimal,
}
