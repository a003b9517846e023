// ============================================================================
// Routes - HTTP surface of the market core
// ============================================================================

pub mod auth;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::app_state::SharedState;
use crate::handlers::*;
use crate::routes::auth::{connect_account, get_wallet_balance};

/// Build the full application router. Collaborating layers consume only
/// these operations and queries; nothing reaches into state directly.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        // ===== REGISTRY ENDPOINTS =====
        .route("/markets", get(get_markets))
        .route("/markets", post(create_market))
        .route("/markets/:id", get(get_market))
        .route("/registry", get(get_registry))
        // ===== MARKET OPERATIONS =====
        .route("/markets/:id/bet", post(place_bet))
        .route("/markets/:id/resolve", post(resolve_market))
        .route("/markets/:id/claim", post(claim_winnings))
        // ===== MARKET QUERIES =====
        .route("/markets/:id/odds", get(get_odds))
        .route("/markets/:id/bets/:account", get(get_user_bet))
        // ===== ACCOUNTS & LEDGER =====
        .route("/accounts/connect", post(connect_account))
        .route("/balance/:account", get(get_wallet_balance))
        .route("/transfer", post(transfer))
        .route("/ledger", get(get_ledger_activity))
        // ===== HEALTH CHECK =====
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
