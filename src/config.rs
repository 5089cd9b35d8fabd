use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub auth: AuthConfig,
}

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 30;

/// Session token settings shared by the login handler and the auth extractor.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            cors_origins,
            auth: AuthConfig::from_env()?,
        })
    }
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let session_ttl_hours = parse_ttl_hours(env::var("SESSION_TTL_HOURS").ok().as_deref());
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            jwt_secret,
            session_ttl_hours,
            cookie_secure,
        })
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_hours * 3600
    }
}

/// Missing, unparsable or non-positive values fall back to the default;
/// anything above a month is capped.
fn parse_ttl_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|h| *h > 0)
        .map(|h| h.min(MAX_SESSION_TTL_HOURS))
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" https://warkop.id, ,http://localhost:8080 ");
        assert_eq!(origins, vec!["https://warkop.id", "http://localhost:8080"]);
    }

    #[test]
    fn empty_origin_list() {
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn session_ttl_is_clamped() {
        assert_eq!(parse_ttl_hours(None), DEFAULT_SESSION_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some("abc")), DEFAULT_SESSION_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some("-5")), DEFAULT_SESSION_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some(" 8 ")), 8);
        assert_eq!(
            parse_ttl_hours(Some("9223372036854775807")),
            MAX_SESSION_TTL_HOURS
        );
    }
}
