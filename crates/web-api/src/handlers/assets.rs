//! Crypto asset catalog reads.

use axum::{
    extract::{Path, State},
    Json,
};
use coinharbor_data::CryptoAsset;

use crate::error::ApiError;
use crate::server::ApiContext;

/// Lists the full asset catalog.
///
/// # Errors
/// Returns 500 if the store query fails.
pub async fn list_assets(State(ctx): State<ApiContext>) -> Result<Json<Vec<CryptoAsset>>, ApiError> {
    Ok(Json(ctx.store.list_crypto_assets().await?))
}

/// Gets one catalog row by symbol.
///
/// # Errors
/// Returns 404 for an unknown symbol.
pub async fn get_asset(
    State(ctx): State<ApiContext>,
    Path(symbol): Path<String>,
) -> Result<Json<CryptoAsset>, ApiError> {
    let asset = ctx
        .store
        .get_crypto_asset(&symbol)
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))?;

    Ok(Json(asset))
}
