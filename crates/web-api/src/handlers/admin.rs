//! Admin console endpoints: login, user management, and balance actions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use coinharbor_core::{is_valid_approval_code, parse_positive_amount};
use coinharbor_data::{BalanceAction, BalanceActionKind, NewBalanceAction, User, UserUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::server::ApiContext;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminIdentity {
    pub id: i64,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: AdminIdentity,
}

/// Logs an administrator in against the fixed credential list and issues
/// a bearer token.
///
/// # Errors
/// Returns 401 on any credential mismatch.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let admin = ctx
        .admins
        .iter()
        .find(|a| a.username == req.username && a.password == req.password)
        .ok_or_else(|| ApiError::Unauthorized("Invalid admin credentials".to_string()))?;

    let token = ctx.tokens.issue(admin)?;

    Ok(Json(AdminLoginResponse {
        token,
        admin: AdminIdentity {
            id: admin.id,
            username: admin.username.clone(),
            name: admin.name.clone(),
        },
    }))
}

/// Lists all users, passwords stripped.
///
/// # Errors
/// Returns 401 without a valid token.
pub async fn list_users(
    _auth: AdminAuth,
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(ctx.store.list_users().await?))
}

/// Creates a user from the admin console. Same semantics as public
/// registration: flags start false and a zero-balance portfolio is
/// created alongside.
///
/// # Errors
/// Returns 400 for an invalid payload or taken email.
pub async fn create_user(
    _auth: AdminAuth,
    State(ctx): State<ApiContext>,
    Json(req): Json<super::auth::RegisterRequest>,
) -> Result<Json<User>, ApiError> {
    super::auth::register(State(ctx), Json(req)).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdateRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

/// Applies a partial update to a user.
///
/// # Errors
/// Returns 404 for an unknown id.
pub async fn update_user(
    _auth: AdminAuth,
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(req): Json<AdminUserUpdateRequest>,
) -> Result<Json<User>, ApiError> {
    let update = UserUpdate {
        username: req.username,
        email: req.email,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
        address: req.address,
        is_verified: req.is_verified,
        is_admin: req.is_admin,
    };

    let user = ctx
        .store
        .update_user(id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Deletes a user.
///
/// # Errors
/// Returns 404 for an unknown id.
pub async fn delete_user(
    _auth: AdminAuth,
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if ctx.store.delete_user(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("User not found".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceActionPayload {
    user_id: i64,
    #[serde(default)]
    admin_id: Option<i64>,
    action: String,
    amount: String,
    #[serde(default)]
    currency: Option<String>,
    reason: String,
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    tx_hash: Option<String>,
}

/// Credits or debits a user's portfolio balance behind the three approval
/// codes, leaving a ledger entry.
///
/// The checks run in a fixed order so failures are machine-distinguishable:
/// malformed codes (400), wrong codes (401), bad payload (400), unknown
/// user (404) — and nothing is written until all of them pass.
///
/// # Errors
/// See above; 401 is also returned without a valid bearer token.
pub async fn create_balance_action(
    auth: AdminAuth,
    State(ctx): State<ApiContext>,
    Json(body): Json<Value>,
) -> Result<Json<BalanceAction>, ApiError> {
    let mut codes = Vec::with_capacity(3);
    for key in ["code1", "code2", "code3"] {
        let code = body.get(key).and_then(Value::as_str).unwrap_or_default();
        if !is_valid_approval_code(code) {
            return Err(ApiError::BadRequest(
                "All three 6-digit authorization codes are required".to_string(),
            ));
        }
        codes.push(code);
    }

    for (i, code) in codes.iter().enumerate() {
        if ctx.approval_codes.get(i).map(String::as_str) != Some(*code) {
            return Err(ApiError::Unauthorized(
                "Invalid authorization codes".to_string(),
            ));
        }
    }

    let payload: BalanceActionPayload = serde_json::from_value(body)
        .map_err(|_| ApiError::BadRequest("Invalid balance action payload".to_string()))?;

    let kind = BalanceActionKind::parse(&payload.action)
        .filter(|k| matches!(k, BalanceActionKind::Credit | BalanceActionKind::Debit))
        .ok_or_else(|| ApiError::BadRequest("Action must be credit or debit".to_string()))?;

    let amount = parse_positive_amount(&payload.amount)
        .ok_or_else(|| ApiError::BadRequest("Amount must be a positive decimal".to_string()))?;

    let user = ctx
        .store
        .get_user(payload.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let action = ctx
        .store
        .create_balance_action(NewBalanceAction {
            user_id: user.id,
            admin_id: payload.admin_id.unwrap_or(auth.0.sub),
            action: kind,
            amount,
            currency: payload.currency,
            reason: payload.reason,
            wallet_address: payload.wallet_address,
            tx_hash: payload.tx_hash,
        })
        .await?;

    let delta = match kind {
        BalanceActionKind::Debit => -amount,
        _ => amount,
    };

    match ctx.store.apply_balance_delta(user.id, delta).await? {
        Some(portfolio) => tracing::info!(
            "balance action {} applied to user {}: new balance {}",
            action.id,
            user.id,
            portfolio.total_balance
        ),
        None => tracing::warn!(
            "balance action {} recorded for user {} with no portfolio",
            action.id,
            user.id
        ),
    }

    Ok(Json(action))
}

/// Lists all ledger entries, most-recent-first.
///
/// # Errors
/// Returns 401 without a valid token.
pub async fn list_balance_actions(
    _auth: AdminAuth,
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<BalanceAction>>, ApiError> {
    Ok(Json(ctx.store.list_balance_actions().await?))
}

/// Lists the ledger entries targeting one user, most-recent-first.
///
/// # Errors
/// Returns 401 without a valid token.
pub async fn user_balance_actions(
    _auth: AdminAuth,
    State(ctx): State<ApiContext>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BalanceAction>>, ApiError> {
    Ok(Json(ctx.store.get_user_balance_actions(user_id).await?))
}
