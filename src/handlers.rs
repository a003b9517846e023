// HTTP request handlers for the SealBet API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::app_state::SharedState;
use crate::error::MarketError;
use crate::ledger::now;
use crate::market::{Market, Outcome};
use crate::models::*;

impl MarketError {
    fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Unauthorized => StatusCode::FORBIDDEN,
            MarketError::MarketNotFound(_) | MarketError::AccountNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

fn market_summary(market: &Market, now: u64) -> Value {
    json!({
        "id": market.id,
        "question": market.question,
        "deadline": market.deadline,
        "status": market.status(now),
        "yes_pool": market.yes_pool,
        "no_pool": market.no_pool,
        "total_pool": market.total_pool(),
        "odds": market.odds(),
        "is_resolved": market.resolved,
        "winning_outcome": market.winning_outcome,
    })
}

// ===== REGISTRY ENDPOINTS =====

pub async fn create_market(
    State(state): State<SharedState>,
    Json(payload): Json<CreateMarketRequest>,
) -> Result<Json<Value>, MarketError> {
    let mut app = state.lock().unwrap();
    let current = now();

    if payload.account != app.registry.owner {
        return Err(MarketError::Unauthorized);
    }

    // The reserve comes out of the operator treasury, never user funds;
    // refuse creation outright if the treasury cannot cover it, so a
    // rejected request leaves no half-created market behind
    let treasury = app.registry.owner.clone();
    let treasury_balance = app.ledger.balance(&treasury);
    if treasury_balance < app.market_reserve {
        return Err(MarketError::InsufficientBalance {
            available: treasury_balance,
            required: app.market_reserve,
        });
    }

    let id = app
        .registry
        .create_market(&payload.account, payload.question.clone(), payload.deadline, current)?;

    let escrow = app
        .registry
        .market(id)
        .map(|m| m.escrow_address.clone())
        .ok_or(MarketError::MarketNotFound(id))?;
    let reserve = app.market_reserve;
    app.ledger.fund_reserve(&treasury, &escrow, id, reserve)?;

    app.log_activity(
        "📊",
        "MARKET_CREATED",
        &format!("Market {}: {}", id, payload.question),
    );

    Ok(Json(json!({ "success": true, "market_id": id })))
}

pub async fn get_registry(State(state): State<SharedState>) -> Json<Value> {
    let app = state.lock().unwrap();
    Json(json!({
        "owner": app.registry.owner,
        "fee_collector": app.registry.fee_collector,
        "market_count": app.registry.count(),
    }))
}

pub async fn get_markets(State(state): State<SharedState>) -> Json<Value> {
    let app = state.lock().unwrap();
    let current = now();
    let mut markets: Vec<Value> = app
        .registry
        .markets
        .values()
        .map(|m| market_summary(m, current))
        .collect();
    markets.sort_by_key(|m| m["id"].as_u64().unwrap_or(0));
    Json(json!({ "markets": markets }))
}

pub async fn get_market(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, MarketError> {
    let app = state.lock().unwrap();
    let market = app
        .registry
        .market(id)
        .ok_or(MarketError::MarketNotFound(id))?;

    let mut detail = market_summary(market, now());
    detail["created_at"] = json!(market.created_at);
    detail["escrow_address"] = json!(market.escrow_address);
    detail["unique_bettors"] = json!(market.user_bets.len());
    detail["claims"] = json!(market.claimed.len());
    Ok(Json(detail))
}

// ===== MARKET OPERATION ENDPOINTS =====

pub async fn place_bet(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(payload): Json<BetRequest>,
) -> Result<Json<BetResponse>, MarketError> {
    let outcome = Outcome::from_index(payload.outcome)?;
    let mut app = state.lock().unwrap();
    let current = now();

    let market = app
        .registry
        .market(id)
        .ok_or(MarketError::MarketNotFound(id))?;
    market.validate_bet(payload.amount, current)?;
    let escrow = market.escrow_address.clone();

    // Funds first: a failed debit refuses the wager with no market change
    app.ledger
        .place_bet(&payload.account, &escrow, id, outcome, payload.amount)?;

    let market = app
        .registry
        .market_mut(id)
        .ok_or(MarketError::MarketNotFound(id))?;
    // Validated above against the same clock, so recording cannot fail
    market.place_bet(&payload.account, outcome, payload.amount, current)?;
    let user_total = market.user_bet(&payload.account, outcome);

    let new_balance = app.ledger.balance(&payload.account);
    app.log_activity(
        "🎯",
        "BET",
        &format!(
            "{} wagered {} nanoseal on outcome {} in market {}",
            payload.account, payload.amount, payload.outcome, id
        ),
    );

    Ok(Json(BetResponse {
        success: true,
        market_id: id,
        outcome: payload.outcome,
        amount: payload.amount,
        new_balance,
        user_total_on_outcome: user_total,
    }))
}

pub async fn resolve_market(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<Value>, MarketError> {
    let outcome = Outcome::from_index(payload.outcome)?;
    let mut app = state.lock().unwrap();
    let current = now();

    let market = app
        .registry
        .market_mut(id)
        .ok_or(MarketError::MarketNotFound(id))?;
    market.resolve(&payload.account, outcome, current)?;

    app.log_activity(
        "✅",
        "MARKET_RESOLVED",
        &format!("Market {} resolved: outcome {} wins", id, payload.outcome),
    );

    Ok(Json(json!({
        "success": true,
        "market_id": id,
        "winning_outcome": outcome,
    })))
}

pub async fn claim_winnings(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(payload): Json<ClaimRequest>,
) -> Result<Json<ClaimResponse>, MarketError> {
    let mut app = state.lock().unwrap();

    let market = app
        .registry
        .market_mut(id)
        .ok_or(MarketError::MarketNotFound(id))?;
    let settlement = market.claim(&payload.account)?;
    let escrow = market.escrow_address.clone();
    let fee_collector = market.fee_collector.clone();

    // Claim bookkeeping is final; the sends below follow it
    app.ledger
        .payout(&escrow, &payload.account, id, settlement.payout)?;
    if settlement.fee > 0 {
        app.ledger
            .fee_payout(&escrow, &fee_collector, id, settlement.fee)?;
    }

    let new_balance = app.ledger.balance(&payload.account);
    app.log_activity(
        "🏆",
        "CLAIM",
        &format!(
            "{} claimed {} nanoseal from market {}",
            payload.account, settlement.payout, id
        ),
    );

    Ok(Json(ClaimResponse {
        success: true,
        market_id: id,
        payout: settlement.payout,
        new_balance,
    }))
}

// ===== MARKET QUERY ENDPOINTS =====

pub async fn get_odds(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, MarketError> {
    let app = state.lock().unwrap();
    let market = app
        .registry
        .market(id)
        .ok_or(MarketError::MarketNotFound(id))?;
    Ok(Json(json!({ "market_id": id, "odds": market.odds() })))
}

pub async fn get_user_bet(
    State(state): State<SharedState>,
    Path((id, account)): Path<(u64, String)>,
) -> Result<Json<Value>, MarketError> {
    let app = state.lock().unwrap();
    let market = app
        .registry
        .market(id)
        .ok_or(MarketError::MarketNotFound(id))?;
    Ok(Json(json!({
        "market_id": id,
        "account": account,
        "yes": market.user_bet(&account, Outcome::Yes),
        "no": market.user_bet(&account, Outcome::No),
        "claimed": market.claimed.contains(&account),
    })))
}

// ===== LEDGER ENDPOINTS =====

pub async fn transfer(
    State(state): State<SharedState>,
    Json(payload): Json<TransferRequest>,
) -> Result<Json<Value>, MarketError> {
    let mut app = state.lock().unwrap();
    let tx = app
        .ledger
        .transfer(&payload.from, &payload.to, payload.amount)?;
    app.log_activity(
        "💸",
        "TRANSFER",
        &format!(
            "{} → {} | {} nanoseal",
            payload.from, payload.to, payload.amount
        ),
    );
    Ok(Json(json!({ "success": true, "transaction_id": tx.id })))
}

pub async fn get_ledger_activity(State(state): State<SharedState>) -> Json<Value> {
    let app = state.lock().unwrap();
    let recent: Vec<_> = app.ledger.recent_transactions(100);
    Json(json!({
        "stats": app.ledger.stats(),
        "activity": app.activity,
        "transactions": recent,
    }))
}

pub async fn health_check() -> &'static str {
    "SealBet Prediction Market - Online ✅"
}
