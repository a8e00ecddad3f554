//! Transaction repository.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{NewTransaction, Transaction, TransactionStatus, TransactionUpdate};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, kind, symbol, amount, price, fee, status, created_at";

/// Repository for transaction operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all transactions for a user, most-recent-first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r"
            SELECT {TRANSACTION_COLUMNS} FROM transactions
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Inserts a new transaction in `pending` state.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, new: &NewTransaction) -> Result<Transaction> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r"
            INSERT INTO transactions (user_id, kind, symbol, amount, price, fee, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING {TRANSACTION_COLUMNS}
            "
        ))
        .bind(new.user_id)
        .bind(new.kind.as_str())
        .bind(&new.symbol)
        .bind(new.amount)
        .bind(new.price)
        .bind(new.fee)
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Applies a partial update; returns the updated row or `None` if the
    /// id does not exist.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r"
            UPDATE transactions
            SET status = COALESCE($2, status)
            WHERE id = $1
            RETURNING {TRANSACTION_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.status.map(|s| s.as_str().to_string()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Pending transactions created at or before the cutoff, oldest first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn pending_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r"
            SELECT {TRANSACTION_COLUMNS} FROM transactions
            WHERE status = $1 AND created_at <= $2
            ORDER BY created_at, id
            "
        ))
        .bind(TransactionStatus::Pending.as_str())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
