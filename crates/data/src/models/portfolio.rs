//! Portfolio records — one USD balance/value pair per user.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user's aggregate USD balance record, one per user.
///
/// `total_balance` never goes negative: debits clamp at zero at the store
/// layer. Monetary values carry two fraction digits and serialize as
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_value: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a portfolio.
#[derive(Debug, Clone)]
pub struct NewPortfolio {
    pub user_id: i64,
    pub total_balance: Decimal,
    pub total_value: Decimal,
}

impl NewPortfolio {
    /// A zero-balance portfolio, created alongside registration.
    #[must_use]
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            total_balance: Decimal::ZERO,
            total_value: Decimal::ZERO,
        }
    }
}

/// Partial portfolio update. This is a blind overwrite of the named fields;
/// balance mutations go through `Store::apply_balance_delta` instead.
#[derive(Debug, Clone, Default)]
pub struct PortfolioUpdate {
    pub total_balance: Option<Decimal>,
    pub total_value: Option<Decimal>,
}
