//! Portfolio and per-user ledger reads.

use axum::{
    extract::{Path, State},
    Json,
};
use coinharbor_data::{BalanceAction, Holding, Portfolio};
use serde::Serialize;

use crate::error::ApiError;
use crate::server::ApiContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub portfolio: Portfolio,
    pub holdings: Vec<Holding>,
}

/// Gets a user's portfolio together with its holdings.
///
/// # Errors
/// Returns 404 if the user has no portfolio.
pub async fn get_portfolio(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<i64>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let portfolio = ctx
        .store
        .get_portfolio(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Portfolio not found".to_string()))?;

    let holdings = ctx.store.get_holdings(portfolio.id).await?;

    Ok(Json(PortfolioResponse {
        portfolio,
        holdings,
    }))
}

/// Lists the balance actions targeting one user, most-recent-first.
///
/// # Errors
/// Returns 500 if the store query fails.
pub async fn user_balance_actions(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BalanceAction>>, ApiError> {
    Ok(Json(ctx.store.get_user_balance_actions(user_id).await?))
}
