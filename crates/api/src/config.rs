//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use chrono::Duration;

const DEV_JWT_SECRET: &str = "dev-secret";

/// One year.
const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `BRANCHDESK_BIND`
    pub bind_addr: SocketAddr,
    /// `JWT_SECRET`
    pub jwt_secret: String,
    /// `BRANCHDESK_TOKEN_TTL_SECS`; `None` issues non-expiring tokens.
    pub token_ttl: Option<Duration>,
    /// `BRANCHDESK_BCRYPT_COST`
    pub bcrypt_cost: u32,
    /// `BRANCHDESK_USERS_FILE`
    pub users_file: Option<PathBuf>,
    /// `BRANCHDESK_SEED_DEMO`
    pub seed_demo_users: bool,
    /// `BRANCHDESK_DIAGNOSTICS`: mount the `/api/test-*` and `/api/explain`
    /// endpoints, which disclose why a request was denied.
    pub diagnostics: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            users_file: None,
            seed_demo_users: true,
            diagnostics: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults;
    /// set-but-invalid values are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("BRANCHDESK_BIND") {
            config.bind_addr = parse("BRANCHDESK_BIND", &v)?;
        }

        match get("JWT_SECRET") {
            Some(secret) => config.jwt_secret = secret,
            None => tracing::warn!("JWT_SECRET not set; using insecure dev default"),
        }

        if let Some(v) = get("BRANCHDESK_TOKEN_TTL_SECS") {
            let secs: i64 = parse("BRANCHDESK_TOKEN_TTL_SECS", &v)?;
            if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
                bail!("BRANCHDESK_TOKEN_TTL_SECS must be within 1..={MAX_TOKEN_TTL_SECS}, got {secs}");
            }
            let ttl = Duration::try_seconds(secs)
                .with_context(|| format!("BRANCHDESK_TOKEN_TTL_SECS out of range: {secs}"))?;
            config.token_ttl = Some(ttl);
        }

        if let Some(v) = get("BRANCHDESK_BCRYPT_COST") {
            let cost: u32 = parse("BRANCHDESK_BCRYPT_COST", &v)?;
            if !(4..=31).contains(&cost) {
                bail!("BRANCHDESK_BCRYPT_COST must be within 4..=31, got {cost}");
            }
            config.bcrypt_cost = cost;
        }

        config.users_file = get("BRANCHDESK_USERS_FILE").map(PathBuf::from);

        if let Some(v) = get("BRANCHDESK_SEED_DEMO") {
            config.seed_demo_users = parse_flag("BRANCHDESK_SEED_DEMO", &v)?;
        }
        if let Some(v) = get("BRANCHDESK_DIAGNOSTICS") {
            config.diagnostics = parse_flag("BRANCHDESK_DIAGNOSTICS", &v)?;
        }

        Ok(config)
    }
}

fn parse<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: '{value}'"))
}

fn parse_flag(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("invalid value for {key}: '{value}' (expected true/false)"),
    }
}
