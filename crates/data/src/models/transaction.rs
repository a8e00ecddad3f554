//! Transaction records — attempted buy/sell/swap orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of a trade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Buy,
    Sell,
    Swap,
}

impl TransactionKind {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Swap => "swap",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            "swap" => Some(Self::Swap),
            _ => None,
        }
    }
}

/// Lifecycle status of a transaction.
///
/// Orders are created `pending` and flipped to `completed` by the
/// settlement worker. There is no failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
}

impl TransactionStatus {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// An attempted buy/sell/swap order.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns true if the order is a buy.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        TransactionKind::parse(&self.kind) == Some(TransactionKind::Buy)
    }
}

/// Fields required to create a transaction. Status always starts `pending`;
/// id and timestamp are server-assigned.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub kind: TransactionKind,
    pub symbol: String,
    pub amount: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
}

/// Partial transaction update, e.g. flipping status at settlement.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub status: Option<TransactionStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        for kind in [
            TransactionKind::Buy,
            TransactionKind::Sell,
            TransactionKind::Swap,
        ] {
            assert_eq!(TransactionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::parse("short"), None);
    }

    #[test]
    fn status_round_trips() {
        assert_eq!(
            TransactionStatus::parse("PENDING"),
            Some(TransactionStatus::Pending)
        );
        assert_eq!(
            TransactionStatus::parse("completed"),
            Some(TransactionStatus::Completed)
        );
        assert_eq!(TransactionStatus::parse("failed"), None);
    }
}
