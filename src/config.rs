use std::env;

use crate::engine::scoring::{
    SawCoefficients, DEFAULT_URGENCY_COEFFICIENT, DEFAULT_WEIGHT_COEFFICIENT,
};
use crate::engine::urgency::DEFAULT_HORIZON_DAYS;
use crate::engine::weight::{default_type_weights, parse_type_weights, WeightPolicy};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_hash_iterations: u32,
    pub weight_policy: WeightPolicy,
    pub type_weights: Vec<(String, f64)>,
    pub horizon_days: i64,
    pub coefficients: SawCoefficients,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
            jwt_secret: "change-me".to_string(),
            token_ttl_hours: 24,
            password_hash_iterations: 260_000,
            weight_policy: WeightPolicy::Category,
            type_weights: default_type_weights(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            coefficients: SawCoefficients::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET_KEY")
            .map(|raw| raw.trim_matches('"').to_string())
            .map_err(|_| AppError::Internal("JWT_SECRET_KEY must be set".to_string()))?;

        let log_format = match env::var("LOG_FORMAT") {
            Ok(raw) => parse_log_format(&raw)?,
            Err(_) => defaults.log_format,
        };

        let type_weights = match env::var("TYPE_WEIGHTS") {
            Ok(raw) => parse_type_weights(&raw)
                .map_err(|err| AppError::Internal(format!("invalid TYPE_WEIGHTS: {err}")))?,
            Err(_) => defaults.type_weights,
        };

        let config = Self {
            http_port: parse_or_default("HTTP_PORT", defaults.http_port)?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
            jwt_secret,
            token_ttl_hours: parse_or_default("TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            password_hash_iterations: parse_or_default(
                "PASSWORD_HASH_ITERATIONS",
                defaults.password_hash_iterations,
            )?,
            weight_policy: parse_or_default("WEIGHT_POLICY", defaults.weight_policy)?,
            type_weights,
            horizon_days: parse_or_default("URGENCY_HORIZON_DAYS", DEFAULT_HORIZON_DAYS)?,
            coefficients: SawCoefficients {
                weight: parse_or_default("SAW_WEIGHT_COEFFICIENT", DEFAULT_WEIGHT_COEFFICIENT)?,
                urgency: parse_or_default("SAW_URGENCY_COEFFICIENT", DEFAULT_URGENCY_COEFFICIENT)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::Internal("JWT_SECRET_KEY cannot be empty".to_string()));
        }

        if self.token_ttl_hours <= 0 {
            return Err(AppError::Internal("TOKEN_TTL_HOURS must be > 0".to_string()));
        }

        if self.password_hash_iterations == 0 {
            return Err(AppError::Internal(
                "PASSWORD_HASH_ITERATIONS must be > 0".to_string(),
            ));
        }

        if self.horizon_days <= 0 {
            return Err(AppError::Internal("URGENCY_HORIZON_DAYS must be > 0".to_string()));
        }

        self.coefficients
            .validate()
            .map_err(|err| AppError::Internal(format!("invalid SAW coefficients: {err}")))
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "compact" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        other => Err(AppError::Internal(format!(
            "invalid LOG_FORMAT: {other} (expected compact or json)"
        ))),
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
