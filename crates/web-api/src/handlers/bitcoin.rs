//! Bitcoin price and conversion endpoints.
//!
//! Upstream failure never surfaces here; the price feed degrades to its
//! cache or fallback internally.

use axum::{
    extract::{Path, State},
    Json,
};
use coinharbor_core::parse_non_negative_amount;
use coinharbor_data::{BitcoinPrice, BtcConversion};

use crate::error::ApiError;
use crate::server::ApiContext;

/// Returns the current (possibly cached) BTC/USD price and 24h change.
pub async fn price(State(ctx): State<ApiContext>) -> Json<BitcoinPrice> {
    Json(ctx.price_feed.get_price().await)
}

/// Converts a USD amount into BTC units with the tiered display format.
///
/// # Errors
/// Returns 400 unless the path segment parses as a non-negative number.
pub async fn convert(
    State(ctx): State<ApiContext>,
    Path(usd_amount): Path<String>,
) -> Result<Json<BtcConversion>, ApiError> {
    let usd = parse_non_negative_amount(&usd_amount).ok_or_else(|| {
        ApiError::BadRequest("Amount must be a non-negative number".to_string())
    })?;

    Ok(Json(ctx.price_feed.convert(usd).await))
}
