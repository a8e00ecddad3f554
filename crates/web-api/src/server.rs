use crate::auth::TokenService;
use crate::handlers;
use axum::{
    routing::{get, patch, post},
    Router,
};
use coinharbor_core::AdminCredential;
use coinharbor_data::{BitcoinPriceFeed, Store};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn Store>,
    pub price_feed: Arc<BitcoinPriceFeed>,
    pub tokens: TokenService,
    pub admins: Arc<Vec<AdminCredential>>,
    pub approval_codes: Arc<Vec<String>>,
}

pub struct ApiServer {
    ctx: ApiContext,
}

impl ApiServer {
    #[must_use]
    pub const fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/health", get(handlers::health::health))
            .route("/api/auth/register", post(handlers::auth::register))
            .route("/api/auth/login", post(handlers::auth::login))
            .route("/api/crypto/assets", get(handlers::assets::list_assets))
            .route("/api/crypto/assets/:symbol", get(handlers::assets::get_asset))
            .route("/api/portfolio/:user_id", get(handlers::portfolio::get_portfolio))
            .route("/api/trade", post(handlers::trade::place_trade))
            .route(
                "/api/transactions/:user_id",
                get(handlers::trade::list_transactions),
            )
            .route(
                "/api/user/:user_id/balance-actions",
                get(handlers::portfolio::user_balance_actions),
            )
            .route("/api/admin/auth/login", post(handlers::admin::login))
            .route(
                "/api/admin/users",
                get(handlers::admin::list_users).post(handlers::admin::create_user),
            )
            .route(
                "/api/admin/users/:id",
                patch(handlers::admin::update_user).delete(handlers::admin::delete_user),
            )
            .route(
                "/api/admin/balance-action",
                post(handlers::admin::create_balance_action),
            )
            .route(
                "/api/admin/balance-actions",
                get(handlers::admin::list_balance_actions),
            )
            .route(
                "/api/admin/user-balance-actions/:user_id",
                get(handlers::admin::user_balance_actions),
            )
            .route("/api/bitcoin/price", get(handlers::bitcoin::price))
            .route(
                "/api/bitcoin/convert/:usd_amount",
                get(handlers::bitcoin::convert),
            )
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.ctx.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve
    /// requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
