use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub db_max_connections: u32,

    /// Offset from UTC, in minutes, that defines a local working day.
    pub local_utc_offset_minutes: i32,
    pub location_cache_ttl_secs: u64,

    // Rate limiting
    pub rate_kiosk_per_min: u32,
    pub rate_protected_per_min: u32,

    pub log_dir: String,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            db_max_connections: or_default("DB_MAX_CONNECTIONS", 10)?,

            local_utc_offset_minutes: or_default("LOCAL_UTC_OFFSET_MINUTES", 480)?, // UTC+8
            location_cache_ttl_secs: or_default("LOCATION_CACHE_TTL_SECS", 60)?,

            rate_kiosk_per_min: or_default("RATE_KIOSK_PER_MIN", 120)?,
            rate_protected_per_min: or_default("RATE_PROTECTED_PER_MIN", 1000)?,

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        };

        config.local_offset()?;
        Ok(config)
    }

    pub fn local_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.local_utc_offset_minutes * 60).ok_or_else(|| {
            anyhow!(
                "LOCAL_UTC_OFFSET_MINUTES out of range: {}",
                self.local_utc_offset_minutes
            )
        })
    }
}

#[cfg(test)]
pub mod testing {
    use super::Config;

    pub fn config() -> Config {
        Config {
            database_url: "mysql://localhost/attendance".into(),
            jwt_secret: "test-secret".into(),
            server_addr: "127.0.0.1:0".into(),
            api_prefix: "/api".into(),
            db_max_connections: 1,
            local_utc_offset_minutes: 480,
            location_cache_ttl_secs: 60,
            rate_kiosk_per_min: 120,
            rate_protected_per_min: 1000,
            log_dir: "logs".into(),
        }
    }
}
