//! Data models for the CoinHarbor wallet backend.
//!
//! All monetary values use `rust_decimal::Decimal` and serialize as strings.
//! Models derive `sqlx::FromRow` for database compatibility and serialize
//! with camelCase field names (the front-end contract).

pub mod asset;
pub mod balance_action;
pub mod holding;
pub mod portfolio;
pub mod transaction;
pub mod user;

pub use asset::{CryptoAsset, NewCryptoAsset};
pub use balance_action::{BalanceAction, BalanceActionKind, NewBalanceAction};
pub use holding::{Holding, HoldingUpdate, NewHolding};
pub use portfolio::{NewPortfolio, Portfolio, PortfolioUpdate};
pub use transaction::{
    NewTransaction, Transaction, TransactionKind, TransactionStatus, TransactionUpdate,
};
pub use user::{NewUser, User, UserUpdate};
