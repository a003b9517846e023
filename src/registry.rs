// Factory and index for markets. Creation is owner-gated; identifiers are
// sequential, 1-based, and dense.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{MarketError, Result};
use crate::market::Market;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRegistry {
    /// Identity allowed to create markets, immutable
    pub owner: String,

    /// Default fee destination propagated to every new market, immutable
    pub fee_collector: String,

    /// Number of markets created; doubles as the next identifier
    pub market_count: u64,

    /// Markets keyed by identifier; populated for all of [1, market_count]
    pub markets: HashMap<u64, Market>,
}

impl MarketRegistry {
    pub fn new(owner: String, fee_collector: String) -> Self {
        Self {
            owner,
            fee_collector,
            market_count: 0,
            markets: HashMap::new(),
        }
    }

    /// Instantiate a new market under owner gating and record it at the
    /// next identifier. The service funds the market's operating reserve
    /// out of the treasury right after this returns.
    pub fn create_market(
        &mut self,
        caller: &str,
        question: String,
        deadline: u64,
        now: u64,
    ) -> Result<u64> {
        if caller != self.owner {
            return Err(MarketError::Unauthorized);
        }
        if deadline <= now {
            return Err(MarketError::InvalidDeadline);
        }

        self.market_count += 1;
        let id = self.market_count;
        let market = Market::new(
            id,
            question,
            deadline,
            self.owner.clone(),
            self.fee_collector.clone(),
            now,
        );
        self.markets.insert(id, market);
        Ok(id)
    }

    /// Lookup by identifier; absent, not an error, outside [1, count].
    pub fn market(&self, id: u64) -> Option<&Market> {
        self.markets.get(&id)
    }

    pub fn market_mut(&mut self, id: u64) -> Option<&mut Market> {
        self.markets.get_mut(&id)
    }

    pub fn count(&self) -> u64 {
        self.market_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;
    const DAY: u64 = 86_400;

    fn registry() -> MarketRegistry {
        MarketRegistry::new("OPERATOR".to_string(), "FEE_COLLECTOR".to_string())
    }

    #[test]
    fn non_owner_cannot_create() {
        let mut r = registry();
        assert_eq!(
            r.create_market("MALLORY", "q".to_string(), NOW + DAY, NOW),
            Err(MarketError::Unauthorized)
        );
        assert_eq!(r.count(), 0);
        assert!(r.markets.is_empty());
    }

    #[test]
    fn past_or_present_deadline_rejected() {
        let mut r = registry();
        assert_eq!(
            r.create_market("OPERATOR", "q".to_string(), NOW, NOW),
            Err(MarketError::InvalidDeadline)
        );
        assert_eq!(
            r.create_market("OPERATOR", "q".to_string(), NOW - 1, NOW),
            Err(MarketError::InvalidDeadline)
        );
        assert_eq!(r.count(), 0);
    }

    #[test]
    fn identifiers_are_sequential_and_dense() {
        let mut r = registry();
        for expected in 1..=3u64 {
            let id = r
                .create_market("OPERATOR", format!("q{}", expected), NOW + DAY, NOW)
                .unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(r.count(), 3);
        for id in 1..=3u64 {
            assert!(r.market(id).is_some());
        }
        assert!(r.market(0).is_none());
        assert!(r.market(4).is_none());
    }

    #[test]
    fn new_market_is_seeded_from_the_registry() {
        let mut r = registry();
        let id = r
            .create_market("OPERATOR", "Will it rain tomorrow?".to_string(), NOW + DAY, NOW)
            .unwrap();
        let m = r.market(id).unwrap();
        assert_eq!(m.question, "Will it rain tomorrow?");
        assert_eq!(m.deadline, NOW + DAY);
        assert_eq!(m.admin, "OPERATOR");
        assert_eq!(m.fee_collector, "FEE_COLLECTOR");
        assert_eq!(m.total_pool(), 0);
        assert!(!m.resolved);
        assert_eq!(m.escrow_address, format!("escrow_market_{}", id));
    }
}
