use serde::Deserialize;

/// Longest accepted `SESSION_TTL_DAYS`.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_days: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: 7,
            cookie_name: "articlehub_session".into(),
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let defaults = SessionConfig::default();
        let session = SessionConfig {
            ttl_days: match std::env::var("SESSION_TTL_DAYS") {
                Ok(raw) => parse_ttl_days(&raw)?,
                Err(_) => defaults.ttl_days,
            },
            cookie_name: std::env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            cookie_secure: std::env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.cookie_secure),
        };
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        Ok(Self {
            database_url,
            max_connections,
            session,
        })
    }
}

fn parse_ttl_days(raw: &str) -> anyhow::Result<i64> {
    let days: i64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("SESSION_TTL_DAYS={raw:?}: {e}"))?;
    if !(1..=MAX_SESSION_TTL_DAYS).contains(&days) {
        anyhow::bail!("SESSION_TTL_DAYS must be between 1 and {MAX_SESSION_TTL_DAYS}, got {days}");
    }
    Ok(days)
}
