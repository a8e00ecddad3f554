//! REST API for the CoinHarbor wallet backend.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{AdminAuth, AdminClaims, TokenService};
pub use error::ApiError;
pub use server::{ApiContext, ApiServer};
