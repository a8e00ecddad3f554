//! In-memory store backend.
//!
//! RwLock-guarded maps with monotonic id counters, satisfying the same
//! contract as the Postgres backend. Used for tests, seeding, and
//! development without a database.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{
    BalanceAction, CryptoAsset, Holding, HoldingUpdate, NewBalanceAction, NewCryptoAsset,
    NewHolding, NewPortfolio, NewTransaction, NewUser, Portfolio, PortfolioUpdate, Transaction,
    TransactionStatus, TransactionUpdate, User, UserUpdate,
};
use crate::store::Store;

#[derive(Default)]
struct State {
    users: HashMap<i64, User>,
    portfolios: HashMap<i64, Portfolio>,
    holdings: HashMap<i64, Holding>,
    transactions: HashMap<i64, Transaction>,
    assets: HashMap<i64, CryptoAsset>,
    balance_actions: HashMap<i64, BalanceAction>,
    next_user_id: i64,
    next_portfolio_id: i64,
    next_holding_id: i64,
    next_transaction_id: i64,
    next_asset_id: i64,
    next_balance_action_id: i64,
}

/// Map-backed `Store` implementation.
pub struct MemoryStore {
    state: RwLock<State>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }
}

/// Normalizes a USD value to exactly two fraction digits, matching the
/// NUMERIC(20, 2) columns of the Postgres backend.
fn usd(value: Decimal) -> Decimal {
    let mut value = value.round_dp(2);
    value.rescale(2);
    value
}

fn most_recent_first<T>(mut rows: Vec<T>, key: impl Fn(&T) -> (DateTime<Utc>, i64)) -> Vec<T> {
    rows.sort_by_key(|row| {
        let (created_at, id) = key(row);
        (std::cmp::Reverse(created_at), std::cmp::Reverse(id))
    });
    rows
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn create_user(&self, new: NewUser) -> Result<User> {
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|user| user.username == new.username || user.email == new.email)
        {
            bail!("unique constraint violation on username or email");
        }
        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            username: new.username,
            email: new.email,
            password: new.password,
            password_hash: None,
            first_name: new.first_name,
            last_name: new.last_name,
            address: new.address,
            is_verified: false,
            is_admin: false,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password) = update.password {
            user.password = password;
        }
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(address) = update.address {
            user.address = Some(address);
        }
        if let Some(is_verified) = update.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(is_admin) = update.is_admin {
            user.is_admin = is_admin;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let removed = state.users.remove(&id).is_some();
        if removed {
            let portfolio_ids: Vec<i64> = state
                .portfolios
                .values()
                .filter(|p| p.user_id == id)
                .map(|p| p.id)
                .collect();
            state.portfolios.retain(|_, p| p.user_id != id);
            state
                .holdings
                .retain(|_, h| !portfolio_ids.contains(&h.portfolio_id));
            state.transactions.retain(|_, t| t.user_id != id);
        }
        Ok(removed)
    }

    async fn get_portfolio(&self, user_id: i64) -> Result<Option<Portfolio>> {
        let state = self.state.read().await;
        Ok(state
            .portfolios
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio> {
        let mut state = self.state.write().await;
        if state.portfolios.values().any(|p| p.user_id == new.user_id) {
            bail!("portfolio already exists for user {}", new.user_id);
        }
        state.next_portfolio_id += 1;
        let portfolio = Portfolio {
            id: state.next_portfolio_id,
            user_id: new.user_id,
            total_balance: usd(new.total_balance),
            total_value: usd(new.total_value),
            updated_at: Utc::now(),
        };
        state.portfolios.insert(portfolio.id, portfolio.clone());
        Ok(portfolio)
    }

    async fn update_portfolio(
        &self,
        user_id: i64,
        update: PortfolioUpdate,
    ) -> Result<Option<Portfolio>> {
        let mut state = self.state.write().await;
        let Some(portfolio) = state.portfolios.values_mut().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(total_balance) = update.total_balance {
            portfolio.total_balance = usd(total_balance);
        }
        if let Some(total_value) = update.total_value {
            portfolio.total_value = usd(total_value);
        }
        portfolio.updated_at = Utc::now();
        Ok(Some(portfolio.clone()))
    }

    async fn apply_balance_delta(&self, user_id: i64, delta: Decimal) -> Result<Option<Portfolio>> {
        let mut state = self.state.write().await;
        let Some(portfolio) = state.portfolios.values_mut().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };
        let new_balance = usd((portfolio.total_balance + delta).max(Decimal::ZERO));
        portfolio.total_balance = new_balance;
        portfolio.total_value = new_balance;
        portfolio.updated_at = Utc::now();
        Ok(Some(portfolio.clone()))
    }

    async fn get_holdings(&self, portfolio_id: i64) -> Result<Vec<Holding>> {
        let state = self.state.read().await;
        let mut holdings: Vec<Holding> = state
            .holdings
            .values()
            .filter(|h| h.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        holdings.sort_by_key(|h| h.id);
        Ok(holdings)
    }

    async fn create_holding(&self, new: NewHolding) -> Result<Holding> {
        let mut state = self.state.write().await;
        state.next_holding_id += 1;
        let holding = Holding {
            id: state.next_holding_id,
            portfolio_id: new.portfolio_id,
            symbol: new.symbol,
            amount: new.amount,
            average_price: new.average_price,
            current_price: new.current_price,
            updated_at: Utc::now(),
        };
        state.holdings.insert(holding.id, holding.clone());
        Ok(holding)
    }

    async fn update_holding(&self, id: i64, update: HoldingUpdate) -> Result<Option<Holding>> {
        let mut state = self.state.write().await;
        let Some(holding) = state.holdings.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(amount) = update.amount {
            holding.amount = amount;
        }
        if let Some(average_price) = update.average_price {
            holding.average_price = average_price;
        }
        if let Some(current_price) = update.current_price {
            holding.current_price = current_price;
        }
        holding.updated_at = Utc::now();
        Ok(Some(holding.clone()))
    }

    async fn delete_holding(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.holdings.remove(&id).is_some())
    }

    async fn get_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        let rows: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        Ok(most_recent_first(rows, |t| (t.created_at, t.id)))
    }

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        let mut state = self.state.write().await;
        state.next_transaction_id += 1;
        let transaction = Transaction {
            id: state.next_transaction_id,
            user_id: new.user_id,
            kind: new.kind.as_str().to_string(),
            symbol: new.symbol,
            amount: new.amount,
            price: new.price,
            fee: new.fee,
            status: TransactionStatus::Pending.as_str().to_string(),
            created_at: Utc::now(),
        };
        state
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        id: i64,
        update: TransactionUpdate,
    ) -> Result<Option<Transaction>> {
        let mut state = self.state.write().await;
        let Some(transaction) = state.transactions.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            transaction.status = status.as_str().to_string();
        }
        Ok(Some(transaction.clone()))
    }

    async fn pending_transactions_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut rows: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| {
                t.status == TransactionStatus::Pending.as_str() && t.created_at <= cutoff
            })
            .cloned()
            .collect();
        rows.sort_by_key(|t| (t.created_at, t.id));
        Ok(rows)
    }

    async fn list_crypto_assets(&self) -> Result<Vec<CryptoAsset>> {
        let state = self.state.read().await;
        let mut assets: Vec<CryptoAsset> = state.assets.values().cloned().collect();
        assets.sort_by_key(|a| a.id);
        Ok(assets)
    }

    async fn get_crypto_asset(&self, symbol: &str) -> Result<Option<CryptoAsset>> {
        let state = self.state.read().await;
        Ok(state
            .assets
            .values()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
            .cloned())
    }

    async fn upsert_crypto_asset(&self, new: NewCryptoAsset) -> Result<CryptoAsset> {
        let mut state = self.state.write().await;
        if let Some(asset) = state
            .assets
            .values_mut()
            .find(|a| a.symbol.eq_ignore_ascii_case(&new.symbol))
        {
            asset.name = new.name;
            asset.current_price = new.current_price;
            asset.change_24h = new.change_24h;
            asset.market_cap = new.market_cap;
            asset.volume_24h = new.volume_24h;
            asset.updated_at = Utc::now();
            return Ok(asset.clone());
        }
        state.next_asset_id += 1;
        let asset = CryptoAsset {
            id: state.next_asset_id,
            symbol: new.symbol,
            name: new.name,
            current_price: new.current_price,
            change_24h: new.change_24h,
            market_cap: new.market_cap,
            volume_24h: new.volume_24h,
            updated_at: Utc::now(),
        };
        state.assets.insert(asset.id, asset.clone());
        Ok(asset)
    }

    async fn list_balance_actions(&self) -> Result<Vec<BalanceAction>> {
        let state = self.state.read().await;
        let rows: Vec<BalanceAction> = state.balance_actions.values().cloned().collect();
        Ok(most_recent_first(rows, |a| (a.created_at, a.id)))
    }

    async fn create_balance_action(&self, new: NewBalanceAction) -> Result<BalanceAction> {
        let mut state = self.state.write().await;
        state.next_balance_action_id += 1;
        let action = BalanceAction {
            id: state.next_balance_action_id,
            user_id: new.user_id,
            admin_id: new.admin_id,
            action: new.action.as_str().to_string(),
            amount: usd(new.amount),
            currency: new.currency.unwrap_or_else(|| "USD".to_string()),
            reason: new.reason,
            wallet_address: new.wallet_address,
            tx_hash: new.tx_hash,
            created_at: Utc::now(),
        };
        state.balance_actions.insert(action.id, action.clone());
        Ok(action)
    }

    async fn get_user_balance_actions(&self, user_id: i64) -> Result<Vec<BalanceAction>> {
        let state = self.state.read().await;
        let rows: Vec<BalanceAction> = state
            .balance_actions
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        Ok(most_recent_first(rows, |a| (a.created_at, a.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BalanceActionKind, TransactionKind};
    use rust_decimal_macros::dec;

    fn make_new_user(n: u32) -> NewUser {
        NewUser {
            username: format!("user{n}"),
            email: format!("user{n}@example.com"),
            password: "pass".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            address: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.create_user(make_new_user(1)).await.unwrap();

        let mut dup = make_new_user(2);
        dup.email = "user1@example.com".to_string();
        assert!(store.create_user(dup).await.is_err());

        // Distinct emails still succeed.
        store.create_user(make_new_user(3)).await.unwrap();
    }

    #[tokio::test]
    async fn balance_delta_clamps_at_zero() {
        let store = MemoryStore::new();
        let user = store.create_user(make_new_user(1)).await.unwrap();
        store
            .create_portfolio(NewPortfolio::empty(user.id))
            .await
            .unwrap();

        let credited = store
            .apply_balance_delta(user.id, dec!(1000.00))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credited.total_balance, dec!(1000.00));
        assert_eq!(credited.total_value, dec!(1000.00));

        let debited = store
            .apply_balance_delta(user.id, dec!(-2500.00))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(debited.total_balance, Decimal::ZERO);
        assert_eq!(debited.total_value, Decimal::ZERO);
    }

    #[tokio::test]
    async fn balance_delta_on_unknown_user_is_none() {
        let store = MemoryStore::new();
        let result = store.apply_balance_delta(42, dec!(10)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn user_balance_actions_filter_and_order() {
        let store = MemoryStore::new();
        let alice = store.create_user(make_new_user(1)).await.unwrap();
        let bob = store.create_user(make_new_user(2)).await.unwrap();

        for (user_id, amount) in [(alice.id, dec!(10)), (bob.id, dec!(20)), (alice.id, dec!(30))]
        {
            store
                .create_balance_action(NewBalanceAction {
                    user_id,
                    admin_id: 1,
                    action: BalanceActionKind::Credit,
                    amount,
                    currency: None,
                    reason: "test".to_string(),
                    wallet_address: None,
                    tx_hash: None,
                })
                .await
                .unwrap();
        }

        let actions = store.get_user_balance_actions(alice.id).await.unwrap();
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| a.user_id == alice.id));
        // Most recent first.
        assert!(actions[0].id > actions[1].id);
        assert_eq!(actions[0].currency, "USD");
    }

    #[tokio::test]
    async fn transactions_start_pending_and_list_recent_first() {
        let store = MemoryStore::new();
        let user = store.create_user(make_new_user(1)).await.unwrap();

        for amount in [dec!(1), dec!(2)] {
            store
                .create_transaction(NewTransaction {
                    user_id: user.id,
                    kind: TransactionKind::Buy,
                    symbol: "BTC".to_string(),
                    amount,
                    price: dec!(100),
                    fee: Decimal::ZERO,
                })
                .await
                .unwrap();
        }

        let transactions = store.get_transactions(user.id).await.unwrap();
        assert_eq!(transactions.len(), 2);
        assert!(transactions.iter().all(|t| t.status == "pending"));
        assert!(transactions[0].id > transactions[1].id);

        let due = store
            .pending_transactions_before(Utc::now())
            .await
            .unwrap();
        assert_eq!(due.len(), 2);
    }

    #[tokio::test]
    async fn users_are_found_by_username_and_email() {
        let store = MemoryStore::new();
        let created = store.create_user(make_new_user(1)).await.unwrap();

        let by_username = store.get_user_by_username("user1").await.unwrap().unwrap();
        assert_eq!(by_username.id, created.id);
        let by_email = store
            .get_user_by_email("user1@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
        assert!(store.get_user_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn portfolio_update_overwrites_named_fields() {
        let store = MemoryStore::new();
        let user = store.create_user(make_new_user(1)).await.unwrap();
        store
            .create_portfolio(NewPortfolio::empty(user.id))
            .await
            .unwrap();

        let updated = store
            .update_portfolio(
                user.id,
                PortfolioUpdate {
                    total_balance: Some(dec!(42.5)),
                    total_value: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.total_balance, dec!(42.50));
        assert_eq!(updated.total_value, Decimal::ZERO);

        let missing = store
            .update_portfolio(999, PortfolioUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn holdings_can_be_deleted() {
        let store = MemoryStore::new();
        let user = store.create_user(make_new_user(1)).await.unwrap();
        let portfolio = store
            .create_portfolio(NewPortfolio::empty(user.id))
            .await
            .unwrap();
        let holding = store
            .create_holding(NewHolding {
                portfolio_id: portfolio.id,
                symbol: "ETH".to_string(),
                amount: dec!(2),
                average_price: dec!(3000),
                current_price: dec!(3000),
            })
            .await
            .unwrap();

        assert!(store.delete_holding(holding.id).await.unwrap());
        assert!(!store.delete_holding(holding.id).await.unwrap());
        assert!(store.get_holdings(portfolio.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn asset_upsert_is_keyed_by_symbol() {
        let store = MemoryStore::new();
        let new_asset = |price| NewCryptoAsset {
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            current_price: price,
            change_24h: 1.5,
            market_cap: dec!(1000000),
            volume_24h: dec!(50000),
        };

        let first = store.upsert_crypto_asset(new_asset(dec!(100))).await.unwrap();
        let second = store.upsert_crypto_asset(new_asset(dec!(200))).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.current_price, dec!(200));
        assert_eq!(store.list_crypto_assets().await.unwrap().len(), 1);
    }
}
