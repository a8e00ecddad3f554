//! PostgreSQL store backend.
//!
//! A thin `Store` adapter over the per-entity repositories sharing one
//! connection pool. Migrations are embedded and applied at connect time.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::models::{
    BalanceAction, CryptoAsset, Holding, HoldingUpdate, NewBalanceAction, NewCryptoAsset,
    NewHolding, NewPortfolio, NewTransaction, NewUser, Portfolio, PortfolioUpdate, Transaction,
    TransactionUpdate, User, UserUpdate,
};
use crate::repositories::Repositories;
use crate::store::Store;

/// `Store` implementation backed by PostgreSQL.
pub struct PgStore {
    repos: Repositories,
}

impl PgStore {
    /// Connects to the database, applies pending migrations, and returns
    /// the store.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established or a
    /// migration fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!().run(&pool).await?;

        Ok(Self::from_pool(pool))
    }

    /// Wraps an existing pool without running migrations.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            repos: Repositories::new(pool),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.repos.users.get(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.repos.users.get_by_username(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repos.users.get_by_email(email).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.repos.users.list().await
    }

    async fn create_user(&self, new: NewUser) -> Result<User> {
        self.repos.users.insert(&new).await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        self.repos.users.update(id, &update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.repos.users.delete(id).await
    }

    async fn get_portfolio(&self, user_id: i64) -> Result<Option<Portfolio>> {
        self.repos.portfolios.get_by_user(user_id).await
    }

    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio> {
        self.repos.portfolios.insert(&new).await
    }

    async fn update_portfolio(
        &self,
        user_id: i64,
        update: PortfolioUpdate,
    ) -> Result<Option<Portfolio>> {
        self.repos.portfolios.update(user_id, &update).await
    }

    async fn apply_balance_delta(&self, user_id: i64, delta: Decimal) -> Result<Option<Portfolio>> {
        self.repos.portfolios.apply_delta(user_id, delta).await
    }

    async fn get_holdings(&self, portfolio_id: i64) -> Result<Vec<Holding>> {
        self.repos.holdings.list_for_portfolio(portfolio_id).await
    }

    async fn create_holding(&self, new: NewHolding) -> Result<Holding> {
        self.repos.holdings.insert(&new).await
    }

    async fn update_holding(&self, id: i64, update: HoldingUpdate) -> Result<Option<Holding>> {
        self.repos.holdings.update(id, &update).await
    }

    async fn delete_holding(&self, id: i64) -> Result<bool> {
        self.repos.holdings.delete(id).await
    }

    async fn get_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        self.repos.transactions.list_for_user(user_id).await
    }

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        self.repos.transactions.insert(&new).await
    }

    async fn update_transaction(
        &self,
        id: i64,
        update: TransactionUpdate,
    ) -> Result<Option<Transaction>> {
        self.repos.transactions.update(id, &update).await
    }

    async fn pending_transactions_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        self.repos.transactions.pending_before(cutoff).await
    }

    async fn list_crypto_assets(&self) -> Result<Vec<CryptoAsset>> {
        self.repos.assets.list().await
    }

    async fn get_crypto_asset(&self, symbol: &str) -> Result<Option<CryptoAsset>> {
        self.repos.assets.get_by_symbol(symbol).await
    }

    async fn upsert_crypto_asset(&self, new: NewCryptoAsset) -> Result<CryptoAsset> {
        self.repos.assets.upsert(&new).await
    }

    async fn list_balance_actions(&self) -> Result<Vec<BalanceAction>> {
        self.repos.balance_actions.list().await
    }

    async fn create_balance_action(&self, new: NewBalanceAction) -> Result<BalanceAction> {
        self.repos.balance_actions.insert(&new).await
    }

    async fn get_user_balance_actions(&self, user_id: i64) -> Result<Vec<BalanceAction>> {
        self.repos.balance_actions.list_for_user(user_id).await
    }
}
