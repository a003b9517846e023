use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a unique wallet address for a newly onboarded account.
/// Format: SEAL_[32 hex characters]
pub fn generate_wallet_address(account: &str) -> String {
    let mut hasher = Sha256::new();

    // Salt with the clock so two accounts with the same name never collide
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    hasher.update(format!("{}{}", account, timestamp).as_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("SEAL_{}", digest[..32].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_has_prefix_and_length() {
        let addr = generate_wallet_address("alice");
        assert!(addr.starts_with("SEAL_"));
        assert_eq!(addr.len(), 5 + 32);
    }
}
