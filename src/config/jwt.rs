use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: u64, // seconds, 1 day by default
}

impl JwtConfig {
    pub fn from_env() -> Result<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable must be set"))?;

        Self::new(secret, env::var("JWT_ACCESS_EXPIRATION").ok().and_then(|s| s.parse().ok()))
    }

    pub fn new(secret: String, access_token_expiry: Option<u64>) -> Result<Self> {
        if secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters"
            ));
        }

        Ok(Self {
            secret,
            access_token_expiry: access_token_expiry.unwrap_or(86_400),
        })
    }
}
