/// SealBet Prediction Market Ledger
/// Exports all modules for use as a library crate

pub mod app_state;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod market;
pub mod models;
pub mod registry;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use error::{MarketError, Result};
pub use ledger::{Ledger, LedgerStats, Transaction, TxType};
pub use market::{BetTotals, ClaimSettlement, Market, MarketOdds, MarketStatus, Outcome};
pub use registry::MarketRegistry;
pub use routes::build_router;

/// Protocol fee skimmed from each market's total pool, in basis points
pub const FEE_BPS: u64 = 200;

/// Basis-point denominator for fee and odds arithmetic
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Smallest currency unit: 1 SEAL = 10^9 nanoseal
pub const NANOSEAL_PER_SEAL: u64 = 1_000_000_000;

/// Operating reserve moved into each new market's escrow (0.05 SEAL)
pub const DEFAULT_MARKET_RESERVE: u64 = 50_000_000;

/// Development faucet for newly connected accounts (100 SEAL)
pub const DEFAULT_FAUCET_AMOUNT: u64 = 100 * NANOSEAL_PER_SEAL;

/// Genesis balance of the operator treasury (10,000 SEAL)
pub const DEFAULT_TREASURY_BALANCE: u64 = 10_000 * NANOSEAL_PER_SEAL;
