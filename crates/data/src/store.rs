//! The storage capability trait implemented by both backends.
//!
//! Each operation is a single-entity, single-statement primitive; absence
//! is `Ok(None)`, never an error. The one multi-field atomic operation is
//! `apply_balance_delta`, which clamps at zero and mirrors the new balance
//! into `total_value` in one step.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{
    BalanceAction, CryptoAsset, Holding, HoldingUpdate, NewBalanceAction, NewCryptoAsset,
    NewHolding, NewPortfolio, NewTransaction, NewUser, Portfolio, PortfolioUpdate, Transaction,
    TransactionUpdate, User, UserUpdate,
};

#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for health reporting ("memory" or "postgres").
    fn backend_name(&self) -> &'static str;

    // Users

    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    /// Inserts a user with `is_verified=false`, `is_admin=false`. Unique
    /// violations on username/email surface as errors.
    async fn create_user(&self, new: NewUser) -> Result<User>;
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;

    // Portfolios

    async fn get_portfolio(&self, user_id: i64) -> Result<Option<Portfolio>>;
    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio>;
    /// Blind overwrite of the named fields plus a refreshed `updated_at`.
    async fn update_portfolio(
        &self,
        user_id: i64,
        update: PortfolioUpdate,
    ) -> Result<Option<Portfolio>>;
    /// Atomically sets `total_balance = max(0, total_balance + delta)` and
    /// mirrors the result into `total_value`.
    async fn apply_balance_delta(&self, user_id: i64, delta: Decimal) -> Result<Option<Portfolio>>;

    // Holdings

    async fn get_holdings(&self, portfolio_id: i64) -> Result<Vec<Holding>>;
    async fn create_holding(&self, new: NewHolding) -> Result<Holding>;
    async fn update_holding(&self, id: i64, update: HoldingUpdate) -> Result<Option<Holding>>;
    async fn delete_holding(&self, id: i64) -> Result<bool>;

    // Transactions

    /// All transactions for a user, most-recent-first.
    async fn get_transactions(&self, user_id: i64) -> Result<Vec<Transaction>>;
    /// Inserts with status `pending` and a server timestamp.
    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        id: i64,
        update: TransactionUpdate,
    ) -> Result<Option<Transaction>>;
    /// Pending transactions created at or before `cutoff` — the settlement
    /// worker's queue.
    async fn pending_transactions_before(&self, cutoff: DateTime<Utc>)
        -> Result<Vec<Transaction>>;

    // Asset catalog

    async fn list_crypto_assets(&self) -> Result<Vec<CryptoAsset>>;
    async fn get_crypto_asset(&self, symbol: &str) -> Result<Option<CryptoAsset>>;
    /// Upsert keyed by symbol.
    async fn upsert_crypto_asset(&self, new: NewCryptoAsset) -> Result<CryptoAsset>;

    // Balance-action ledger

    /// All ledger entries, most-recent-first.
    async fn list_balance_actions(&self) -> Result<Vec<BalanceAction>>;
    /// Append-only insert; currency defaults to `"USD"`.
    async fn create_balance_action(&self, new: NewBalanceAction) -> Result<BalanceAction>;
    /// Ledger entries targeting one user, most-recent-first.
    async fn get_user_balance_actions(&self, user_id: i64) -> Result<Vec<BalanceAction>>;
}
