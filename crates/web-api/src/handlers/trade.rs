//! Trade placement and transaction history.

use axum::{
    extract::{Path, State},
    Json,
};
use coinharbor_core::{parse_non_negative_amount, parse_positive_amount};
use coinharbor_data::{NewTransaction, Transaction, TransactionKind};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::ApiContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
}

/// Places a buy/sell/swap order. The order is acknowledged immediately as
/// `pending`; the settlement worker completes it later.
///
/// # Errors
/// Returns 400 for an invalid payload or unknown symbol.
pub async fn place_trade(
    State(ctx): State<ApiContext>,
    Json(req): Json<TradeRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let bad = |message: &str| ApiError::BadRequest(message.to_string());

    let user_id = req.user_id.ok_or_else(|| bad("userId is required"))?;
    let kind = req
        .kind
        .as_deref()
        .and_then(TransactionKind::parse)
        .ok_or_else(|| bad("type must be buy, sell, or swap"))?;
    let symbol = req.symbol.ok_or_else(|| bad("symbol is required"))?;
    let amount = req
        .amount
        .as_deref()
        .and_then(parse_positive_amount)
        .ok_or_else(|| bad("amount must be a positive decimal"))?;
    let price = req
        .price
        .as_deref()
        .and_then(parse_positive_amount)
        .ok_or_else(|| bad("price must be a positive decimal"))?;
    let fee = match req.fee.as_deref() {
        None => Decimal::ZERO,
        Some(raw) => {
            parse_non_negative_amount(raw).ok_or_else(|| bad("fee must be a non-negative decimal"))?
        }
    };

    let asset = ctx
        .store
        .get_crypto_asset(&symbol)
        .await?
        .ok_or_else(|| bad("Unknown symbol"))?;

    let transaction = ctx
        .store
        .create_transaction(NewTransaction {
            user_id,
            kind,
            symbol: asset.symbol,
            amount,
            price,
            fee,
        })
        .await?;

    Ok(Json(transaction))
}

/// Lists a user's transactions, most-recent-first.
///
/// # Errors
/// Returns 500 if the store query fails.
pub async fn list_transactions(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(ctx.store.get_transactions(user_id).await?))
}
