// SealBet Prediction Market - Main Entry Point
// Binary-outcome markets with pooled wagers, owner-gated resolution, and
// pro-rata claims settled on an internal ledger.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use sealbet_market::{build_router, AppState, SharedState};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    println!("\n═══════════════════════════════════════════════");
    println!("     🎲 SealBet Prediction Market");
    println!("═══════════════════════════════════════════════\n");

    let state: SharedState = Arc::new(Mutex::new(AppState::new()));

    // Clone state for shutdown handler before moving into router
    let shutdown_state = state.clone();

    let app = build_router(state);

    let port: u16 = std::env::var("SEALBET_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("🚀 Server running on http://{}", addr);
    tracing::info!("📋 Endpoints:");
    tracing::info!("   POST /accounts/connect       - Connect account (creates & funds if new)");
    tracing::info!("   POST /markets                - Create market (owner only)");
    tracing::info!("   GET  /markets                - List markets");
    tracing::info!("   GET  /markets/:id            - Market details");
    tracing::info!("   POST /markets/:id/bet        - Place wager");
    tracing::info!("   POST /markets/:id/resolve    - Resolve market (admin, post-deadline)");
    tracing::info!("   POST /markets/:id/claim      - Claim winnings");
    tracing::info!("   GET  /markets/:id/odds       - Implied odds in basis points");
    tracing::info!("   GET  /markets/:id/bets/:acct - Account's wagers on a market");
    tracing::info!("   GET  /balance/:account       - Account balance");
    tracing::info!("   POST /transfer               - Transfer between accounts");
    tracing::info!("   GET  /ledger                 - Ledger activity");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("❌ Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Save state on CTRL+C, then exit
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::info!("🛑 Shutdown signal received, saving state...");
        if let Ok(app_state) = shutdown_state.lock() {
            match app_state.save_to_disk() {
                Ok(()) => tracing::info!("✅ State saved"),
                Err(e) => tracing::error!("❌ Failed to save state: {}", e),
            }
        }
        std::process::exit(0);
    });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("❌ Server error: {}", e);
    }
}
