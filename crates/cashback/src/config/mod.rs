use crate::analysis::{AnalysisConfig, DEFAULT_IMPROVEMENT_THRESHOLD, DEFAULT_TOP_OPPORTUNITIES};
use crate::rewards::CapResetPolicy;
use crate::transactions::RewardEligibility;
use rust_decimal::Decimal;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let improvement_threshold = match env::var("APP_IMPROVEMENT_THRESHOLD") {
            Ok(value) => Decimal::from_str(value.trim())
                .ok()
                .filter(|threshold| !threshold.is_sign_negative())
                .ok_or(ConfigError::InvalidThreshold { value })?,
            Err(_) => DEFAULT_IMPROVEMENT_THRESHOLD,
        };

        let top_opportunities = match env::var("APP_TOP_OPPORTUNITIES") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidTopOpportunities { value })?,
            Err(_) => DEFAULT_TOP_OPPORTUNITIES,
        };

        let cap_reset = match env::var("APP_CAP_RESET") {
            Ok(value) => {
                CapResetPolicy::parse(&value).ok_or(ConfigError::InvalidCapReset { value })?
            }
            Err(_) => CapResetPolicy::default(),
        };

        let eligibility = match env::var("APP_REWARD_ELIGIBILITY") {
            Ok(value) => {
                RewardEligibility::parse(&value).ok_or(ConfigError::InvalidEligibility { value })?
            }
            Err(_) => RewardEligibility::default(),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            analysis: AnalysisConfig {
                improvement_threshold,
                top_opportunities,
                cap_reset,
                eligibility,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ansi: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidThreshold { value: String },
    InvalidTopOpportunities { value: String },
    InvalidCapReset { value: String },
    InvalidEligibility { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "APP_IMPROVEMENT_THRESHOLD must be a non-negative decimal, got '{}'",
                value
            ),
            ConfigError::InvalidTopOpportunities { value } => write!(
                f,
                "APP_TOP_OPPORTUNITIES must be a non-negative integer, got '{}'",
                value
            ),
            ConfigError::InvalidCapReset { value } => write!(
                f,
                "APP_CAP_RESET must be 'calendar' or 'lifetime', got '{}'",
                value
            ),
            ConfigError::InvalidEligibility { value } => write!(
                f,
                "APP_REWARD_ELIGIBILITY must be 'debits' or 'absolute', got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
