//! Holding repository.

use anyhow::Result;
use sqlx::PgPool;

use crate::models::{Holding, HoldingUpdate, NewHolding};

const HOLDING_COLUMNS: &str =
    "id, portfolio_id, symbol, amount, average_price, current_price, updated_at";

/// Repository for holding operations.
#[derive(Debug, Clone)]
pub struct HoldingRepository {
    pool: PgPool,
}

impl HoldingRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all holdings for a portfolio.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list_for_portfolio(&self, portfolio_id: i64) -> Result<Vec<Holding>> {
        let holdings = sqlx::query_as::<_, Holding>(&format!(
            "SELECT {HOLDING_COLUMNS} FROM holdings WHERE portfolio_id = $1 ORDER BY id"
        ))
        .bind(portfolio_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(holdings)
    }

    /// Inserts a new holding and returns the created row.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, new: &NewHolding) -> Result<Holding> {
        let holding = sqlx::query_as::<_, Holding>(&format!(
            r"
            INSERT INTO holdings (portfolio_id, symbol, amount, average_price, current_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {HOLDING_COLUMNS}
            "
        ))
        .bind(new.portfolio_id)
        .bind(&new.symbol)
        .bind(new.amount)
        .bind(new.average_price)
        .bind(new.current_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(holding)
    }

    /// Applies a partial update; returns the updated row or `None` if the
    /// id does not exist.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn update(&self, id: i64, update: &HoldingUpdate) -> Result<Option<Holding>> {
        let holding = sqlx::query_as::<_, Holding>(&format!(
            r"
            UPDATE holdings
            SET amount = COALESCE($2, amount),
                average_price = COALESCE($3, average_price),
                current_price = COALESCE($4, current_price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {HOLDING_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.amount)
        .bind(update.average_price)
        .bind(update.current_price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(holding)
    }

    /// Deletes a holding; returns true if a row was removed.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM holdings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
