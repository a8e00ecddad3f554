//! Holding records — a portfolio's position in one asset.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A position in one crypto asset: amount held, volume-weighted average
/// entry price, and the last price observed at settlement time.
///
/// Created on the first buy of a symbol, re-averaged on subsequent buys.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: i64,
    pub portfolio_id: i64,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub average_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_price: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a holding.
#[derive(Debug, Clone)]
pub struct NewHolding {
    pub portfolio_id: i64,
    pub symbol: String,
    pub amount: Decimal,
    pub average_price: Decimal,
    pub current_price: Decimal,
}

/// Partial holding update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct HoldingUpdate {
    pub amount: Option<Decimal>,
    pub average_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
}
