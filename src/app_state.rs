// Application state management

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::auth::generate_wallet_address;
use crate::ledger::Ledger;
use crate::registry::MarketRegistry;
use crate::{DEFAULT_FAUCET_AMOUNT, DEFAULT_MARKET_RESERVE, DEFAULT_TREASURY_BALANCE};

pub type SharedState = Arc<Mutex<AppState>>;

pub struct AppState {
    pub ledger: Ledger,
    pub registry: MarketRegistry,
    /// Fixed reserve moved from the treasury into each new market's escrow
    pub market_reserve: u64,
    /// Development faucet credited to newly connected accounts
    pub faucet_amount: u64,
    pub state_file: String,
    pub activity: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct PersistedState {
    ledger: Ledger,
    registry: MarketRegistry,
}

fn env_amount(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppState {
    pub fn new() -> Self {
        let owner = std::env::var("SEALBET_OWNER").unwrap_or_else(|_| "OPERATOR".to_string());
        let fee_collector =
            std::env::var("SEALBET_FEE_COLLECTOR").unwrap_or_else(|_| "FEE_COLLECTOR".to_string());
        let state_file =
            std::env::var("SEALBET_STATE_FILE").unwrap_or_else(|_| "data/state.json".to_string());

        let mut state = Self {
            ledger: Ledger::new(),
            registry: MarketRegistry::new(owner.clone(), fee_collector.clone()),
            market_reserve: env_amount("SEALBET_MARKET_RESERVE", DEFAULT_MARKET_RESERVE),
            faucet_amount: env_amount("SEALBET_FAUCET_AMOUNT", DEFAULT_FAUCET_AMOUNT),
            state_file,
            activity: Vec::new(),
        };

        // Genesis: the operator treasury funds market reserves; the fee
        // collector starts empty
        let owner_address = generate_wallet_address(&owner);
        let collector_address = generate_wallet_address(&fee_collector);
        state
            .ledger
            .register(&owner, &owner_address, DEFAULT_TREASURY_BALANCE);
        state.ledger.register(&fee_collector, &collector_address, 0);

        if state.load_from_disk().is_ok() {
            tracing::info!("✅ Loaded persisted state from {}", state.state_file);
        } else {
            tracing::info!("ℹ️  No persisted state found, starting fresh");
        }

        state
    }

    pub fn log_activity(&mut self, emoji: &str, action: &str, details: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        let entry = format!("[{}] {} {} | {}", timestamp, emoji, action, details);
        tracing::info!("{}", entry);
        self.activity.push(entry);
        if self.activity.len() > 1000 {
            self.activity.remove(0);
        }
    }

    pub fn save_to_disk(&self) -> Result<(), String> {
        let snapshot = PersistedState {
            ledger: self.ledger.clone(),
            registry: self.registry.clone(),
        };

        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("Failed to serialize state: {}", e))?;

        if let Some(parent) = std::path::Path::new(&self.state_file).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create state directory: {}", e))?;
        }
        std::fs::write(&self.state_file, json)
            .map_err(|e| format!("Failed to write state file: {}", e))?;

        Ok(())
    }

    fn load_from_disk(&mut self) -> Result<(), String> {
        let json =
            std::fs::read_to_string(&self.state_file).map_err(|_| "No state file found")?;

        let snapshot: PersistedState = serde_json::from_str(&json)
            .map_err(|e| format!("Failed to deserialize state: {}", e))?;

        self.ledger = snapshot.ledger;
        self.registry = snapshot.registry;

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
