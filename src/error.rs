//! Error types for market and ledger operations.

use thiserror::Error;

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Every way an operation can be rejected. Rejections are side-effect-free:
/// no pool, bet ledger, or claim bookkeeping mutates on a failed call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// Caller lacks the role the operation requires
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    /// Wager submitted at or after the market deadline
    #[error("betting is closed, the deadline has passed")]
    BettingClosed,

    /// Resolution attempted before the market deadline
    #[error("market cannot be resolved before its deadline")]
    TooEarly,

    /// Second or later resolution attempt
    #[error("market has already been resolved")]
    AlreadyResolved,

    /// Claim attempted before the market was resolved
    #[error("market has not been resolved yet")]
    NotResolved,

    /// Repeat claim by a bettor who already withdrew
    #[error("winnings already claimed by this account")]
    AlreadyClaimed,

    /// Claim by an account with no stake on the winning outcome
    #[error("account has no winning bet to claim")]
    NothingToClaim,

    /// Outcome index other than NO (0) or YES (1)
    #[error("outcome must be YES (1) or NO (0)")]
    InvalidOutcome,

    /// Zero-amount wager
    #[error("bet amount must be positive")]
    InvalidAmount,

    /// Market creation with a deadline that is not in the future
    #[error("deadline must be in the future")]
    InvalidDeadline,

    /// Lookup or operation on an identifier the registry never assigned
    #[error("market {0} not found")]
    MarketNotFound(u64),

    /// Ledger operation against an account that was never registered
    #[error("account {0} not found")]
    AccountNotFound(String),

    /// Ledger debit larger than the account's balance
    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance { available: u64, required: u64 },
}
