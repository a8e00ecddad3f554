//! Admin balance-action ledger records.
//!
//! Append-only: rows are created once per authorized balance change and
//! never mutated or deleted. Summed, the ledger should reconcile with
//! portfolio balances, but the live balance is maintained independently.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceActionKind {
    Credit,
    Debit,
    /// Written once when a portfolio is initialized by seeding.
    SystemInit,
}

impl BalanceActionKind {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::SystemInit => "system_init",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            "system_init" => Some(Self::SystemInit),
            _ => None,
        }
    }
}

/// An append-only audit entry for an administrator-initiated balance change.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAction {
    pub id: i64,
    /// Target user whose balance changed.
    pub user_id: i64,
    /// Acting administrator.
    pub admin_id: i64,
    pub action: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub reason: String,
    pub wallet_address: Option<String>,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to append a ledger entry. Currency defaults to `"USD"`
/// at the store layer when unspecified.
#[derive(Debug, Clone)]
pub struct NewBalanceAction {
    pub user_id: i64,
    pub admin_id: i64,
    pub action: BalanceActionKind,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub reason: String,
    pub wallet_address: Option<String>,
    pub tx_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        for kind in [
            BalanceActionKind::Credit,
            BalanceActionKind::Debit,
            BalanceActionKind::SystemInit,
        ] {
            assert_eq!(BalanceActionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(BalanceActionKind::parse("refund"), None);
    }
}
