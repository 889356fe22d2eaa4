use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Signing settings for bearer tokens. Any of them may be absent at startup;
/// issuing or verifying a token then fails with a configuration error.
#[derive(Clone, Debug, Default)]
pub struct JwtSettings {
    pub key: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub ttl_hours: i64,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_addr: String,
    pub jwt: JwtSettings,

    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub employee_email_domain: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt: JwtSettings {
                key: non_empty("JWT_KEY"),
                issuer: non_empty("JWT_ISSUER"),
                audience: non_empty("JWT_AUDIENCE"),
                ttl_hours: parse_or("JWT_TTL_HOURS", 24)?,
            },

            rate_limit_enabled: parse_or("RATE_LIMIT_ENABLED", true)?,
            rate_login_per_min: parse_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_register_per_min: parse_or("RATE_REGISTER_PER_MIN", 30)?,
            rate_protected_per_min: parse_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            employee_email_domain: env::var("EMPLOYEE_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "company.com".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            database_max_connections: 1,
            server_addr: "127.0.0.1:0".to_string(),
            jwt: JwtSettings {
                key: Some("test-signing-key-that-is-long-enough-for-hs256".to_string()),
                issuer: Some("ems-tests".to_string()),
                audience: Some("ems-clients".to_string()),
                ttl_hours: 24,
            },
            rate_limit_enabled: false,
            rate_login_per_min: 60,
            rate_register_per_min: 30,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
            employee_email_domain: "company.com".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
