//! Portfolio repository.

use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{NewPortfolio, Portfolio, PortfolioUpdate};

const PORTFOLIO_COLUMNS: &str = "id, user_id, total_balance, total_value, updated_at";

/// Repository for portfolio operations.
#[derive(Debug, Clone)]
pub struct PortfolioRepository {
    pool: PgPool,
}

impl PortfolioRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new portfolio and returns the created row.
    ///
    /// # Errors
    /// Returns an error if the database operation fails, including the
    /// one-per-user unique violation.
    pub async fn insert(&self, new: &NewPortfolio) -> Result<Portfolio> {
        let portfolio = sqlx::query_as::<_, Portfolio>(&format!(
            r"
            INSERT INTO portfolios (user_id, total_balance, total_value)
            VALUES ($1, $2, $3)
            RETURNING {PORTFOLIO_COLUMNS}
            "
        ))
        .bind(new.user_id)
        .bind(new.total_balance)
        .bind(new.total_value)
        .fetch_one(&self.pool)
        .await?;

        Ok(portfolio)
    }

    /// Gets the portfolio belonging to a user.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get_by_user(&self, user_id: i64) -> Result<Option<Portfolio>> {
        let portfolio = sqlx::query_as::<_, Portfolio>(&format!(
            "SELECT {PORTFOLIO_COLUMNS} FROM portfolios WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(portfolio)
    }

    /// Overwrites the named fields and refreshes `updated_at`.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        user_id: i64,
        update: &PortfolioUpdate,
    ) -> Result<Option<Portfolio>> {
        let portfolio = sqlx::query_as::<_, Portfolio>(&format!(
            r"
            UPDATE portfolios
            SET total_balance = COALESCE($2, total_balance),
                total_value = COALESCE($3, total_value),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PORTFOLIO_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(update.total_balance)
        .bind(update.total_value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(portfolio)
    }

    /// Atomically applies a clamped balance delta in a single statement.
    ///
    /// Both SET expressions read the pre-update balance, so the clamp and
    /// the mirrored `total_value` agree even under concurrent callers.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn apply_delta(&self, user_id: i64, delta: Decimal) -> Result<Option<Portfolio>> {
        let portfolio = sqlx::query_as::<_, Portfolio>(&format!(
            r"
            UPDATE portfolios
            SET total_balance = GREATEST(0, total_balance + $2),
                total_value = GREATEST(0, total_balance + $2),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PORTFOLIO_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(portfolio)
    }
}
