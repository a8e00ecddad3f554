//! Registration and login.

use axum::{extract::State, Json};
use coinharbor_data::{NewPortfolio, NewUser, User};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::ApiContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
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
}

impl RegisterRequest {
    /// Validates the payload into creation fields.
    fn into_new_user(self) -> Result<NewUser, ApiError> {
        let required = |field: Option<String>, name: &str| {
            field
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ApiError::BadRequest(format!("{name} is required")))
        };

        let email = required(self.email, "email")?;
        if !email.contains('@') {
            return Err(ApiError::BadRequest("Invalid email address".to_string()));
        }

        Ok(NewUser {
            username: required(self.username, "username")?,
            email,
            password: required(self.password, "password")?,
            first_name: required(self.first_name, "firstName")?,
            last_name: required(self.last_name, "lastName")?,
            address: self.address,
        })
    }
}

/// Registers a new user with a zero-balance portfolio.
///
/// # Errors
/// Returns 400 when the payload is invalid or the email is already taken.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<User>, ApiError> {
    let new_user = req.into_new_user()?;

    if ctx.store.get_user_by_email(&new_user.email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let user = ctx
        .store
        .create_user(new_user)
        .await
        .map_err(|e| {
            tracing::warn!("user creation failed: {e:#}");
            ApiError::BadRequest("Failed to create user".to_string())
        })?;

    ctx.store
        .create_portfolio(NewPortfolio::empty(user.id))
        .await?;

    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Logs a user in by email and password.
///
/// Either stored password field may match, for accounts imported from the
/// legacy schema.
///
/// # Errors
/// Returns 401 on any mismatch.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = ctx
        .store
        .get_user_by_email(&req.email)
        .await?
        .filter(|user| user.matches_password(&req.password))
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    Ok(Json(user))
}
