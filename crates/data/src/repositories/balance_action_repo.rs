//! Admin balance-action ledger repository. Insert and read only; ledger
//! rows are never updated or deleted.

use anyhow::Result;
use sqlx::PgPool;

use crate::models::{BalanceAction, NewBalanceAction};

const ACTION_COLUMNS: &str = "id, user_id, admin_id, action, amount, currency, reason, \
                              wallet_address, tx_hash, created_at";

/// Repository for the balance-action ledger.
#[derive(Debug, Clone)]
pub struct BalanceActionRepository {
    pool: PgPool,
}

impl BalanceActionRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all ledger entries, most-recent-first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<BalanceAction>> {
        let actions = sqlx::query_as::<_, BalanceAction>(&format!(
            r"
            SELECT {ACTION_COLUMNS} FROM admin_balance_actions
            ORDER BY created_at DESC, id DESC
            "
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(actions)
    }

    /// Appends a ledger entry; currency defaults to USD.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, new: &NewBalanceAction) -> Result<BalanceAction> {
        let action = sqlx::query_as::<_, BalanceAction>(&format!(
            r"
            INSERT INTO admin_balance_actions
                (user_id, admin_id, action, amount, currency, reason, wallet_address, tx_hash)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'USD'), $6, $7, $8)
            RETURNING {ACTION_COLUMNS}
            "
        ))
        .bind(new.user_id)
        .bind(new.admin_id)
        .bind(new.action.as_str())
        .bind(new.amount)
        .bind(&new.currency)
        .bind(&new.reason)
        .bind(&new.wallet_address)
        .bind(&new.tx_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(action)
    }

    /// Lists ledger entries targeting one user, most-recent-first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<BalanceAction>> {
        let actions = sqlx::query_as::<_, BalanceAction>(&format!(
            r"
            SELECT {ACTION_COLUMNS} FROM admin_balance_actions
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(actions)
    }
}
