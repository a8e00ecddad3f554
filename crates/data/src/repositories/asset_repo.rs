//! Crypto asset catalog repository.

use anyhow::Result;
use sqlx::PgPool;

use crate::models::{CryptoAsset, NewCryptoAsset};

const ASSET_COLUMNS: &str =
    "id, symbol, name, current_price, change_24h, market_cap, volume_24h, updated_at";

/// Repository for the asset catalog.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all catalog rows ordered by id.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<CryptoAsset>> {
        let assets = sqlx::query_as::<_, CryptoAsset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM crypto_assets ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    /// Gets a catalog row by symbol (case-insensitive).
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get_by_symbol(&self, symbol: &str) -> Result<Option<CryptoAsset>> {
        let asset = sqlx::query_as::<_, CryptoAsset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM crypto_assets WHERE UPPER(symbol) = UPPER($1)"
        ))
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }

    /// Upserts a catalog row keyed by symbol.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn upsert(&self, new: &NewCryptoAsset) -> Result<CryptoAsset> {
        let asset = sqlx::query_as::<_, CryptoAsset>(&format!(
            r"
            INSERT INTO crypto_assets (symbol, name, current_price, change_24h, market_cap, volume_24h)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (symbol) DO UPDATE
            SET name = EXCLUDED.name,
                current_price = EXCLUDED.current_price,
                change_24h = EXCLUDED.change_24h,
                market_cap = EXCLUDED.market_cap,
                volume_24h = EXCLUDED.volume_24h,
                updated_at = NOW()
            RETURNING {ASSET_COLUMNS}
            "
        ))
        .bind(&new.symbol)
        .bind(&new.name)
        .bind(new.current_price)
        .bind(new.change_24h)
        .bind(new.market_cap)
        .bind(new.volume_24h)
        .fetch_one(&self.pool)
        .await?;

        Ok(asset)
    }
}
