pub mod handlers;

use crate::application::registry::ApplicationRegistry;
use crate::application::wallet::WalletService;
use crate::domain::ports::SharedProvider;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared handler state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ApplicationRegistry>,
    pub wallet: Arc<WalletService>,
    pub provider: SharedProvider,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/applications",
            post(handlers::submit_application).get(handlers::list_applications),
        )
        .route("/api/applications/stats", get(handlers::application_stats))
        .route("/api/applications/:id/status", post(handlers::set_status))
        .route("/api/registrations", get(handlers::list_registrations))
        .route("/api/wallet/balance", get(handlers::wallet_balance))
        .route("/api/wallet/transactions", get(handlers::transaction_history))
        .route(
            "/api/payees",
            get(handlers::list_payees).post(handlers::add_payee),
        )
        .route("/api/payments", post(handlers::send_payment))
        .route("/oauth/callback", get(handlers::oauth_callback))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
