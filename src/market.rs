// Market settlement state machine: pooled YES/NO wagers, deadline gating,
// admin resolution, pro-rata claims net of the protocol fee.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{MarketError, Result};
use crate::{BPS_DENOMINATOR, FEE_BPS};

/// Binary market outcome. Wire encoding matches the original message
/// layout: NO = 0, YES = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Outcome::No),
            1 => Ok(Outcome::Yes),
            _ => Err(MarketError::InvalidOutcome),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Outcome::No => 0,
            Outcome::Yes => 1,
        }
    }
}

/// Lifecycle phase, derived from the clock and the resolved flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketStatus {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "awaiting_resolution")]
    AwaitingResolution,
    #[serde(rename = "resolved")]
    Resolved,
}

/// Cumulative wagers by one bettor, per outcome. Repeated bets accumulate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BetTotals {
    pub yes: u64,
    pub no: u64,
}

impl BetTotals {
    pub fn on(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.yes,
            Outcome::No => self.no,
        }
    }

    fn add(&mut self, outcome: Outcome, amount: u64) {
        match outcome {
            Outcome::Yes => self.yes += amount,
            Outcome::No => self.no += amount,
        }
    }
}

/// Implied odds per outcome, in basis points of the total pool.
/// Zero on both sides while the pool is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOdds {
    pub yes: u64,
    pub no: u64,
}

/// Amounts owed out of escrow after one successful claim. The fee is
/// non-zero only for the claim that routes it to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimSettlement {
    pub payout: u64,
    pub fee: u64,
}

/// One binary prediction market: a question, a deadline, two outcome
/// pools, and a settlement lifecycle. Created by the registry, mutated by
/// `place_bet` (pre-deadline), `resolve` (once, post-deadline), and
/// `claim` (once per winning bettor, post-resolution). Never destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Registry-assigned identifier (1-based, dense)
    pub id: u64,

    /// Market question, immutable
    pub question: String,

    /// Unix timestamp in seconds; wagers accepted strictly before it
    pub deadline: u64,

    /// Identity allowed to resolve; the registry owner at creation time
    pub admin: String,

    /// Destination for the protocol fee, immutable
    pub fee_collector: String,

    /// Ledger account holding this market's pooled funds and reserve
    pub escrow_address: String,

    /// Creation timestamp
    pub created_at: u64,

    /// Accumulated YES wagers in nanoseal
    pub yes_pool: u64,

    /// Accumulated NO wagers in nanoseal
    pub no_pool: u64,

    /// Cumulative wagers per bettor and outcome
    pub user_bets: HashMap<String, BetTotals>,

    /// Bettors who already withdrew winnings
    pub claimed: HashSet<String>,

    /// Irreversible once set by `resolve`
    pub resolved: bool,

    /// Set exactly when `resolved` flips to true
    pub winning_outcome: Option<Outcome>,

    /// Whether the once-per-market fee has been routed to the collector
    pub fee_paid: bool,
}

impl Market {
    pub fn new(
        id: u64,
        question: String,
        deadline: u64,
        admin: String,
        fee_collector: String,
        now: u64,
    ) -> Self {
        Self {
            id,
            question,
            deadline,
            admin,
            fee_collector,
            escrow_address: format!("escrow_market_{}", id),
            created_at: now,
            yes_pool: 0,
            no_pool: 0,
            user_bets: HashMap::new(),
            claimed: HashSet::new(),
            resolved: false,
            winning_outcome: None,
            fee_paid: false,
        }
    }

    pub fn status(&self, now: u64) -> MarketStatus {
        if self.resolved {
            MarketStatus::Resolved
        } else if now >= self.deadline {
            MarketStatus::AwaitingResolution
        } else {
            MarketStatus::Open
        }
    }

    pub fn pool(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.yes_pool,
            Outcome::No => self.no_pool,
        }
    }

    pub fn total_pool(&self) -> u64 {
        self.yes_pool + self.no_pool
    }

    pub fn user_bet(&self, account: &str, outcome: Outcome) -> u64 {
        self.user_bets
            .get(account)
            .map(|b| b.on(outcome))
            .unwrap_or(0)
    }

    /// Implied odds in basis points. YES truncates; NO is the complement,
    /// so the two always sum to exactly 10000 while the pool is non-empty.
    pub fn odds(&self) -> MarketOdds {
        let total = self.total_pool();
        if total == 0 {
            return MarketOdds { yes: 0, no: 0 };
        }
        let yes = (self.yes_pool as u128 * BPS_DENOMINATOR as u128 / total as u128) as u64;
        MarketOdds {
            yes,
            no: BPS_DENOMINATOR - yes,
        }
    }

    /// Preconditions of `place_bet`, without mutating. The service checks
    /// these before debiting the bettor so a refused wager leaves both the
    /// ledger and the market untouched.
    pub fn validate_bet(&self, amount: u64, now: u64) -> Result<()> {
        if now >= self.deadline {
            return Err(MarketError::BettingClosed);
        }
        if amount == 0 {
            return Err(MarketError::InvalidAmount);
        }
        Ok(())
    }

    /// Record a wager. Amounts accumulate per (bettor, outcome); there is
    /// no upper bound on total wagered.
    pub fn place_bet(&mut self, bettor: &str, outcome: Outcome, amount: u64, now: u64) -> Result<()> {
        self.validate_bet(amount, now)?;
        match outcome {
            Outcome::Yes => self.yes_pool += amount,
            Outcome::No => self.no_pool += amount,
        }
        self.user_bets
            .entry(bettor.to_string())
            .or_default()
            .add(outcome, amount);
        Ok(())
    }

    /// The single irreversible transition. Accepted at most once per
    /// market; a repeat attempt fails with `AlreadyResolved` no matter
    /// which outcome is supplied. Resolution with an empty pool on either
    /// side is allowed.
    pub fn resolve(&mut self, caller: &str, outcome: Outcome, now: u64) -> Result<()> {
        if caller != self.admin {
            return Err(MarketError::Unauthorized);
        }
        if self.resolved {
            return Err(MarketError::AlreadyResolved);
        }
        if now < self.deadline {
            return Err(MarketError::TooEarly);
        }
        self.resolved = true;
        self.winning_outcome = Some(outcome);
        Ok(())
    }

    /// Settle one winning bettor's withdrawal. Fee and distributable are
    /// recomputed from the frozen post-resolution pools on every claim, so
    /// the share formula is idempotent and order-independent across
    /// claimants; the fee itself is routed to the collector exactly once.
    /// Truncation residue stays stranded in escrow.
    pub fn claim(&mut self, caller: &str) -> Result<ClaimSettlement> {
        if !self.resolved {
            return Err(MarketError::NotResolved);
        }
        if self.claimed.contains(caller) {
            return Err(MarketError::AlreadyClaimed);
        }
        let winning = self.winning_outcome.ok_or(MarketError::NotResolved)?;
        let stake = self.user_bet(caller, winning);
        if stake == 0 {
            return Err(MarketError::NothingToClaim);
        }
        let winning_pool = self.pool(winning);
        // stake > 0 already implies a non-empty winning pool; the check
        // stays ahead of the division as an invariant guard
        if winning_pool == 0 {
            return Err(MarketError::NothingToClaim);
        }

        // u128 intermediates: pool * 10000 and stake * distributable must
        // not overflow
        let total = self.total_pool() as u128;
        let fee = total * FEE_BPS as u128 / BPS_DENOMINATOR as u128;
        let distributable = total - fee;
        let payout = (stake as u128 * distributable / winning_pool as u128) as u64;

        self.claimed.insert(caller.to_string());
        let fee_due = if self.fee_paid {
            0
        } else {
            self.fee_paid = true;
            fee as u64
        };

        Ok(ClaimSettlement {
            payout,
            fee: fee_due,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NANOSEAL_PER_SEAL;

    const NANO: u64 = NANOSEAL_PER_SEAL;
    const DAY: u64 = 86_400;
    const NOW: u64 = 1_700_000_000;

    fn market() -> Market {
        Market::new(
            1,
            "Will BTC hit $150k by March 2025?".to_string(),
            NOW + DAY,
            "OPERATOR".to_string(),
            "FEE_COLLECTOR".to_string(),
            NOW,
        )
    }

    #[test]
    fn bets_accumulate_per_bettor_and_outcome() {
        let mut m = market();
        m.place_bet("BETTOR1", Outcome::Yes, 1 * NANO, NOW).unwrap();
        m.place_bet("BETTOR1", Outcome::Yes, 2 * NANO, NOW).unwrap();
        assert_eq!(m.user_bet("BETTOR1", Outcome::Yes), 3 * NANO);
        assert_eq!(m.user_bet("BETTOR1", Outcome::No), 0);
        assert_eq!(m.yes_pool, 3 * NANO);
    }

    #[test]
    fn pools_match_user_bet_sums() {
        let mut m = market();
        m.place_bet("A", Outcome::Yes, 5, NOW).unwrap();
        m.place_bet("B", Outcome::Yes, 7, NOW).unwrap();
        m.place_bet("B", Outcome::No, 11, NOW).unwrap();
        m.place_bet("C", Outcome::No, 13, NOW).unwrap();

        let yes_sum: u64 = m.user_bets.values().map(|b| b.yes).sum();
        let no_sum: u64 = m.user_bets.values().map(|b| b.no).sum();
        assert_eq!(yes_sum, m.yes_pool);
        assert_eq!(no_sum, m.no_pool);
        assert_eq!(m.total_pool(), 36);
    }

    #[test]
    fn bet_rejected_at_and_after_deadline() {
        let mut m = market();
        assert_eq!(
            m.place_bet("A", Outcome::Yes, NANO, NOW + DAY),
            Err(MarketError::BettingClosed)
        );
        assert_eq!(
            m.place_bet("A", Outcome::Yes, NANO, NOW + DAY + 1),
            Err(MarketError::BettingClosed)
        );
        assert_eq!(m.total_pool(), 0);
        // one second before the deadline still goes through
        m.place_bet("A", Outcome::Yes, NANO, NOW + DAY - 1).unwrap();
    }

    #[test]
    fn zero_amount_bet_rejected() {
        let mut m = market();
        assert_eq!(
            m.place_bet("A", Outcome::Yes, 0, NOW),
            Err(MarketError::InvalidAmount)
        );
        assert!(m.user_bets.is_empty());
    }

    #[test]
    fn invalid_outcome_index_rejected() {
        assert_eq!(Outcome::from_index(0).unwrap(), Outcome::No);
        assert_eq!(Outcome::from_index(1).unwrap(), Outcome::Yes);
        assert_eq!(Outcome::from_index(2), Err(MarketError::InvalidOutcome));
    }

    #[test]
    fn odds_quarter_three_quarters() {
        let mut m = market();
        m.place_bet("BETTOR1", Outcome::Yes, 1 * NANO, NOW).unwrap();
        m.place_bet("BETTOR2", Outcome::No, 3 * NANO, NOW).unwrap();
        assert_eq!(m.odds(), MarketOdds { yes: 2500, no: 7500 });
    }

    #[test]
    fn odds_zero_pool_and_exact_sum_under_truncation() {
        let mut m = market();
        assert_eq!(m.odds(), MarketOdds { yes: 0, no: 0 });

        m.place_bet("A", Outcome::Yes, 1, NOW).unwrap();
        m.place_bet("B", Outcome::No, 2, NOW).unwrap();
        let odds = m.odds();
        assert_eq!(odds.yes, 3333);
        assert_eq!(odds.yes + odds.no, 10_000);
    }

    #[test]
    fn resolve_gating() {
        let mut m = market();
        assert_eq!(
            m.resolve("MALLORY", Outcome::Yes, NOW + DAY),
            Err(MarketError::Unauthorized)
        );
        assert_eq!(
            m.resolve("OPERATOR", Outcome::Yes, NOW + DAY - 1),
            Err(MarketError::TooEarly)
        );
        assert!(!m.resolved);

        m.resolve("OPERATOR", Outcome::Yes, NOW + DAY).unwrap();
        assert!(m.resolved);
        assert_eq!(m.winning_outcome, Some(Outcome::Yes));

        // second attempt fails whatever the argument is
        assert_eq!(
            m.resolve("OPERATOR", Outcome::Yes, NOW + DAY),
            Err(MarketError::AlreadyResolved)
        );
        assert_eq!(
            m.resolve("OPERATOR", Outcome::No, NOW + DAY),
            Err(MarketError::AlreadyResolved)
        );
        assert_eq!(m.winning_outcome, Some(Outcome::Yes));
    }

    #[test]
    fn resolve_with_empty_pools_is_allowed() {
        let mut m = market();
        m.resolve("OPERATOR", Outcome::No, NOW + DAY).unwrap();
        assert_eq!(m.winning_outcome, Some(Outcome::No));

        // no stake on the winning side, so any claim is refused
        assert_eq!(m.claim("A"), Err(MarketError::NothingToClaim));
    }

    #[test]
    fn claim_before_resolution_rejected() {
        let mut m = market();
        m.place_bet("A", Outcome::Yes, NANO, NOW).unwrap();
        assert_eq!(m.claim("A"), Err(MarketError::NotResolved));
        assert!(m.claimed.is_empty());
    }

    #[test]
    fn two_sided_market_pays_winner_pool_minus_fee() {
        let mut m = market();
        m.place_bet("BETTOR1", Outcome::Yes, 1 * NANO, NOW).unwrap();
        m.place_bet("BETTOR2", Outcome::No, 1 * NANO, NOW).unwrap();
        m.resolve("OPERATOR", Outcome::Yes, NOW + DAY).unwrap();

        // total 2 SEAL, 2% fee, sole winner takes the distributable
        let s = m.claim("BETTOR1").unwrap();
        assert_eq!(s.payout, 2 * NANO * (BPS_DENOMINATOR - FEE_BPS) / BPS_DENOMINATOR);
        assert_eq!(s.payout, 1_960_000_000);
        assert_eq!(s.fee, 40_000_000);

        assert_eq!(m.claim("BETTOR2"), Err(MarketError::NothingToClaim));
        assert_eq!(m.claim("BETTOR1"), Err(MarketError::AlreadyClaimed));
    }

    #[test]
    fn claims_are_proportional_and_fee_routed_once() {
        let mut m = market();
        m.place_bet("A", Outcome::Yes, 1 * NANO, NOW).unwrap();
        m.place_bet("B", Outcome::Yes, 3 * NANO, NOW).unwrap();
        m.place_bet("C", Outcome::No, 4 * NANO, NOW).unwrap();
        m.resolve("OPERATOR", Outcome::Yes, NOW + DAY).unwrap();

        let a = m.claim("A").unwrap();
        let b = m.claim("B").unwrap();

        // total 8 SEAL, fee 0.16, distributable 7.84 split 1:3
        assert_eq!(a.payout, 1_960_000_000);
        assert_eq!(b.payout, 5_880_000_000);
        assert_eq!(a.fee, 160_000_000);
        assert_eq!(b.fee, 0);
        assert_eq!(a.payout + b.payout + a.fee, m.total_pool());
    }

    #[test]
    fn claim_order_does_not_change_shares() {
        let mut first = market();
        first.place_bet("A", Outcome::No, 7, NOW).unwrap();
        first.place_bet("B", Outcome::No, 13, NOW).unwrap();
        first.place_bet("C", Outcome::Yes, 9, NOW).unwrap();
        first.resolve("OPERATOR", Outcome::No, NOW + DAY).unwrap();

        let mut second = first.clone();

        let a1 = first.claim("A").unwrap().payout;
        let b1 = first.claim("B").unwrap().payout;
        let b2 = second.claim("B").unwrap().payout;
        let a2 = second.claim("A").unwrap().payout;
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
    }

    #[test]
    fn truncation_residue_never_overdraws_the_pool() {
        let mut m = market();
        m.place_bet("A", Outcome::Yes, 1, NOW).unwrap();
        m.place_bet("B", Outcome::Yes, 2, NOW).unwrap();
        m.place_bet("C", Outcome::No, 4, NOW).unwrap();
        m.resolve("OPERATOR", Outcome::Yes, NOW + DAY).unwrap();

        // total 7, fee truncates to 0, shares 7/3 truncate to 2 and 4
        let a = m.claim("A").unwrap();
        let b = m.claim("B").unwrap();
        assert_eq!(a.fee, 0);
        assert_eq!(a.payout, 2);
        assert_eq!(b.payout, 4);
        assert!(a.payout + b.payout + a.fee + b.fee <= m.total_pool());
    }

    #[test]
    fn status_follows_clock_and_resolution() {
        let mut m = market();
        assert_eq!(m.status(NOW), MarketStatus::Open);
        assert_eq!(m.status(NOW + DAY), MarketStatus::AwaitingResolution);
        m.resolve("OPERATOR", Outcome::Yes, NOW + DAY).unwrap();
        assert_eq!(m.status(NOW + DAY), MarketStatus::Resolved);
        assert_eq!(m.status(NOW), MarketStatus::Resolved);
    }
}
