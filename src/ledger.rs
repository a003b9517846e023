/// Native currency ledger backing the markets.
///
/// Accounts, integer balances in nanoseal, and an append-only transaction
/// record. Each market holds its pooled wagers and operating reserve in an
/// escrow account here; bets, reserve funding, payouts, and the protocol
/// fee are all plain transfers between accounts, so total supply is
/// conserved by every operation except explicit deposits.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{MarketError, Result};
use crate::market::Outcome;

/// Transaction types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxType {
    AccountCreated,
    Deposit,
    Transfer,
    Bet,
    ReserveFunded,
    Payout,
    FeePayout,
}

/// A single transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub tx_type: TxType,
    pub from: String,
    pub to: Option<String>,
    pub amount: u64,
    pub market_id: Option<u64>,
    pub outcome: Option<Outcome>,
    pub timestamp: u64,
    pub description: Option<String>,
}

impl Transaction {
    fn new(tx_type: TxType, from: &str, amount: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tx_type,
            from: from.to_string(),
            to: None,
            amount,
            market_id: None,
            outcome: None,
            timestamp: now(),
            description: None,
        }
    }

    fn with_to(mut self, to: &str) -> Self {
        self.to = Some(to.to_string());
        self
    }

    fn with_market(mut self, market_id: u64) -> Self {
        self.market_id = Some(market_id);
        self
    }

    fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

/// Summary counters for the activity endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    pub accounts: usize,
    pub transactions: usize,
    pub total_supply: u64,
    pub bet_volume: u64,
}

/// The ledger tracking all accounts and transactions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Name -> address mapping for registered accounts
    pub accounts: HashMap<String, String>,
    /// Balances in nanoseal, keyed by address
    pub balances: HashMap<String, u64>,
    /// All transactions, append-only
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with an initial balance (a genesis or faucet
    /// deposit, the only way supply enters the ledger)
    pub fn register(&mut self, name: &str, address: &str, initial: u64) {
        self.accounts
            .insert(name.to_uppercase(), address.to_string());
        self.balances.insert(address.to_string(), initial);
        self.transactions
            .push(Transaction::new(TxType::AccountCreated, address, initial));
        tracing::info!("👤 Registered {} ({}) with {} nanoseal", name, address, initial);
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    /// Resolve a name or raw address to an address
    pub fn resolve(&self, id: &str) -> Option<String> {
        if let Some(addr) = self.accounts.get(&id.to_uppercase()) {
            return Some(addr.clone());
        }
        if self.balances.contains_key(id) {
            return Some(id.to_string());
        }
        None
    }

    /// Available balance; zero for unknown accounts
    pub fn balance(&self, id: &str) -> u64 {
        self.resolve(id)
            .and_then(|addr| self.balances.get(&addr).copied())
            .unwrap_or(0)
    }

    /// Sum of all balances. Constant across transfers, bets, payouts, and
    /// fees; changes only on deposits.
    pub fn total_supply(&self) -> u64 {
        self.balances.values().sum()
    }

    /// Mint tokens into an account (faucet/genesis)
    pub fn deposit(&mut self, id: &str, amount: u64) -> Result<u64> {
        let addr = self
            .resolve(id)
            .ok_or_else(|| MarketError::AccountNotFound(id.to_string()))?;
        let balance = self.balances.entry(addr.clone()).or_insert(0);
        *balance += amount;
        let new_balance = *balance;
        self.transactions
            .push(Transaction::new(TxType::Deposit, &addr, amount));
        Ok(new_balance)
    }

    /// Move funds between two existing balance entries. Fails without any
    /// mutation on an unknown account or an overdraft.
    fn move_funds(&mut self, from: &str, to: &str, amount: u64) -> Result<(String, String)> {
        let from_addr = self
            .resolve(from)
            .ok_or_else(|| MarketError::AccountNotFound(from.to_string()))?;
        let to_addr = self
            .resolve(to)
            .ok_or_else(|| MarketError::AccountNotFound(to.to_string()))?;

        let available = self.balances.get(&from_addr).copied().unwrap_or(0);
        if available < amount {
            return Err(MarketError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        if let Some(balance) = self.balances.get_mut(&from_addr) {
            *balance -= amount;
        }
        *self.balances.entry(to_addr.clone()).or_insert(0) += amount;
        Ok((from_addr, to_addr))
    }

    /// Transfer between accounts
    pub fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<Transaction> {
        let (from_addr, to_addr) = self.move_funds(from, to, amount)?;
        let tx = Transaction::new(TxType::Transfer, &from_addr, amount)
            .with_to(&to_addr)
            .with_description(format!("Transfer {} nanoseal", amount));
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Open an escrow account for a market. Escrows have an address but no
    /// name entry; nobody authenticates as one.
    pub fn open_escrow(&mut self, escrow_address: &str) {
        self.balances.entry(escrow_address.to_string()).or_insert(0);
    }

    /// Move a market's operating reserve from the treasury into escrow
    pub fn fund_reserve(
        &mut self,
        treasury: &str,
        escrow: &str,
        market_id: u64,
        amount: u64,
    ) -> Result<Transaction> {
        self.open_escrow(escrow);
        let (from_addr, to_addr) = self.move_funds(treasury, escrow, amount)?;
        let tx = Transaction::new(TxType::ReserveFunded, &from_addr, amount)
            .with_to(&to_addr)
            .with_market(market_id)
            .with_description(format!("Market {} reserve funded", market_id));
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Move a wager from the bettor into the market's escrow
    pub fn place_bet(
        &mut self,
        from: &str,
        escrow: &str,
        market_id: u64,
        outcome: Outcome,
        amount: u64,
    ) -> Result<Transaction> {
        let (from_addr, to_addr) = self.move_funds(from, escrow, amount)?;
        let mut tx = Transaction::new(TxType::Bet, &from_addr, amount)
            .with_to(&to_addr)
            .with_market(market_id)
            .with_description(format!(
                "Bet {} nanoseal on outcome {} in market {}",
                amount,
                outcome.index(),
                market_id
            ));
        tx.outcome = Some(outcome);
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Pay winnings out of escrow to a claimant
    pub fn payout(
        &mut self,
        escrow: &str,
        to: &str,
        market_id: u64,
        amount: u64,
    ) -> Result<Transaction> {
        let (from_addr, to_addr) = self.move_funds(escrow, to, amount)?;
        let tx = Transaction::new(TxType::Payout, &from_addr, amount)
            .with_to(&to_addr)
            .with_market(market_id)
            .with_description(format!(
                "Payout {} nanoseal from market {}",
                amount, market_id
            ));
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Route the protocol fee out of escrow to the collector
    pub fn fee_payout(
        &mut self,
        escrow: &str,
        collector: &str,
        market_id: u64,
        amount: u64,
    ) -> Result<Transaction> {
        let (from_addr, to_addr) = self.move_funds(escrow, collector, amount)?;
        let tx = Transaction::new(TxType::FeePayout, &from_addr, amount)
            .with_to(&to_addr)
            .with_market(market_id)
            .with_description(format!("Protocol fee from market {}", market_id));
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Most recent transactions, newest first
    pub fn recent_transactions(&self, limit: usize) -> Vec<&Transaction> {
        self.transactions.iter().rev().take(limit).collect()
    }

    pub fn stats(&self) -> LedgerStats {
        let bet_volume = self
            .transactions
            .iter()
            .filter(|t| t.tx_type == TxType::Bet)
            .map(|t| t.amount)
            .sum();
        LedgerStats {
            accounts: self.accounts.len(),
            transactions: self.transactions.len(),
            total_supply: self.total_supply(),
            bet_volume,
        }
    }
}

pub fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
