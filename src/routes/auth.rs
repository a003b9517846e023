// Account onboarding routes
// No JWT and no session state: the host environment authenticates callers,
// the ledger only needs the account to exist and hold funds.

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app_state::SharedState;
use crate::auth::generate_wallet_address;

// ===== REQUEST/RESPONSE TYPES =====

#[derive(Debug, Deserialize)]
pub struct ConnectAccountRequest {
    /// Display name used as the ledger identity
    pub account: String,
    /// Optional externally supplied address (SEAL_ABC123...)
    pub address: Option<String>,
}

// ===== ROUTE HANDLERS =====

/// POST /accounts/connect
/// Registers the account if new and credits the development faucet;
/// returns the current balance for an existing account.
pub async fn connect_account(
    State(state): State<SharedState>,
    Json(payload): Json<ConnectAccountRequest>,
) -> Json<Value> {
    let mut app = state.lock().unwrap();

    if app.ledger.is_registered(&payload.account) {
        let balance = app.ledger.balance(&payload.account);
        app.log_activity(
            "🔐",
            "ACCOUNT_CONNECT",
            &format!("{} reconnected | Balance: {} nanoseal", payload.account, balance),
        );
        return Json(json!({
            "success": true,
            "account": payload.account,
            "balance": balance,
            "is_new_account": false,
        }));
    }

    let address = payload
        .address
        .clone()
        .unwrap_or_else(|| generate_wallet_address(&payload.account));
    let faucet = app.faucet_amount;
    app.ledger.register(&payload.account, &address, 0);

    match app.ledger.deposit(&payload.account, faucet) {
        Ok(balance) => {
            app.log_activity(
                "🆕",
                "NEW_ACCOUNT",
                &format!(
                    "{} connected | Funded with {} nanoseal",
                    payload.account, faucet
                ),
            );

            Json(json!({
                "success": true,
                "account": payload.account,
                "address": address,
                "balance": balance,
                "is_new_account": true,
            }))
        }
        Err(e) => Json(json!({
            "success": false,
            "error": format!("Failed to fund account: {}", e),
        })),
    }
}

/// GET /balance/:account
pub async fn get_wallet_balance(
    State(state): State<SharedState>,
    Path(account): Path<String>,
) -> Json<Value> {
    let app = state.lock().unwrap();
    let balance = app.ledger.balance(&account);
    Json(json!({ "account": account, "balance": balance }))
}
