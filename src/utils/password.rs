use anyhow::{Context, Result};
use std::{env, sync::OnceLock};

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// bcrypt work factor, `BCRYPT_COST` clamped to bcrypt's valid range.
fn cost() -> u32 {
    static COST: OnceLock<u32> = OnceLock::new();
    *COST.get_or_init(|| {
        env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(|c| c.clamp(MIN_COST, MAX_COST))
            .unwrap_or(bcrypt::DEFAULT_COST)
    })
}

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, cost()).context("Failed to hash password")
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Failed to verify password")
}
