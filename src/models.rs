// Request and response bodies for the HTTP surface. Caller identity rides
// in the `account` field; the host environment is trusted to have
// authenticated it.

use serde::{Deserialize, Serialize};

/// POST /markets
#[derive(Debug, Deserialize)]
pub struct CreateMarketRequest {
    /// Must equal the registry owner
    pub account: String,
    pub question: String,
    /// Unix seconds; must be in the future
    pub deadline: u64,
}

/// POST /markets/:id/bet
#[derive(Debug, Deserialize)]
pub struct BetRequest {
    pub account: String,
    /// NO = 0, YES = 1
    pub outcome: u8,
    /// Wager in nanoseal
    pub amount: u64,
}

/// POST /markets/:id/resolve
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    /// Must equal the market admin
    pub account: String,
    pub outcome: u8,
}

/// POST /markets/:id/claim
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub account: String,
}

/// POST /transfer
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct BetResponse {
    pub success: bool,
    pub market_id: u64,
    pub outcome: u8,
    pub amount: u64,
    pub new_balance: u64,
    pub user_total_on_outcome: u64,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub success: bool,
    pub market_id: u64,
    pub payout: u64,
    pub new_balance: u64,
}
