// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! # Runtime Configuration
//!
//! This module loads service configuration from the environment at startup.
//! Both observed deployment modes (4-digit / 5-minute and 6-digit / 10-minute
//! codes) are expressible through the same variables; nothing is compiled in.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_ENV` | `production` or `development`; gates the diagnostic `otp` response field | `development` |
//! | `OTP_CODE_LENGTH` | Digits per verification code | `6` |
//! | `OTP_TTL_SECS` | Challenge time-to-live in seconds | `600` |
//! | `OTP_SWEEP_INTERVAL_SECS` | Interval between expired-challenge sweeps | `60` |
//! | `OTP_REQUIRE_ACCOUNT` | Require a pre-existing account for the phone (`true`/`false`) | `false` |
//! | `SESSION_TTL_SECS` | Session token lifetime in seconds | `604800` (7 days) |
//! | `SESSION_SIGNING_SECRET` | HS256 secret for session tokens | Required |
//! | `SMS_GATEWAY_URL` | HTTP SMS gateway endpoint | Optional (log-only delivery) |
//! | `SMS_GATEWAY_TOKEN` | Bearer token for the SMS gateway | Optional |
//! | `SEED_ACCOUNT_PHONE` | Seed account phone for local testing | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use chrono::Duration;
use thiserror::Error;

/// Environment variable name for the session signing secret.
pub const SIGNING_SECRET_ENV: &str = "SESSION_SIGNING_SECRET";

/// Deployment environment. Controls whether diagnostic fields (the issued
/// code in the send-response) are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("environment variable {0} has an invalid value: {1}")]
    InvalidVar(&'static str, String),
}

/// Service configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment.
    pub environment: Environment,
    /// Number of digits in a verification code.
    pub code_length: usize,
    /// Challenge time-to-live.
    pub challenge_ttl: Duration,
    /// Interval between background sweeps of expired challenges.
    pub sweep_interval: std::time::Duration,
    /// Whether verification requires a pre-existing account for the phone
    /// (the professional flow) or accepts any phone (open enrollment).
    pub require_account: bool,
    /// Session token lifetime.
    pub session_ttl: Duration,
    /// HS256 secret for session tokens.
    pub signing_secret: String,
    /// SMS gateway endpoint; `None` means log-only delivery (development).
    pub sms_gateway_url: Option<String>,
    /// Bearer token for the SMS gateway.
    pub sms_gateway_token: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment =
            Environment::parse(&env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()));

        let signing_secret =
            env::var(SIGNING_SECRET_ENV).map_err(|_| ConfigError::MissingVar(SIGNING_SECRET_ENV))?;

        Ok(Self {
            environment,
            code_length: parse_var("OTP_CODE_LENGTH", 6)?,
            challenge_ttl: Duration::seconds(parse_var("OTP_TTL_SECS", 600)?),
            sweep_interval: std::time::Duration::from_secs(parse_var(
                "OTP_SWEEP_INTERVAL_SECS",
                60,
            )?),
            require_account: parse_var("OTP_REQUIRE_ACCOUNT", false)?,
            session_ttl: Duration::seconds(parse_var("SESSION_TTL_SECS", 7 * 24 * 60 * 60)?),
            signing_secret,
            sms_gateway_url: env::var("SMS_GATEWAY_URL").ok(),
            sms_gateway_token: env::var("SMS_GATEWAY_TOKEN").ok(),
        })
    }

    /// Whether the issued code may be echoed in the send-response.
    /// Never true in production.
    pub fn expose_codes(&self) -> bool {
        self.environment != Environment::Production
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar(name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Development-mode configuration for unit tests.
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Development,
            code_length: 6,
            challenge_ttl: Duration::seconds(600),
            sweep_interval: std::time::Duration::from_secs(60),
            require_account: false,
            session_ttl: Duration::seconds(3600),
            signing_secret: "test-signing-secret".to_string(),
            sms_gateway_url: None,
            sms_gateway_token: None,
        }
    }
}
