use std::env;
use std::fmt;
use std::num::ParseFloatError;

use credit_rules::compliance::ComplianceThresholds;

/// Distinguishes runtime behavior for different stages of the console.
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

/// Top-level configuration for the console.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub compliance: ComplianceThresholds,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = ComplianceThresholds::default();
        let compliance = ComplianceThresholds {
            salary_rule_ratio: number("CREDIT_SALARY_RULE_RATIO", defaults.salary_rule_ratio)?,
            affordability_warning_ratio: number(
                "CREDIT_AFFORDABILITY_WARNING_RATIO",
                defaults.affordability_warning_ratio,
            )?,
            expense_warning_ratio: number(
                "CREDIT_EXPENSE_WARNING_RATIO",
                defaults.expense_warning_ratio,
            )?,
            utilization_warning_pct: number(
                "CREDIT_UTILIZATION_WARNING_PCT",
                defaults.utilization_warning_pct,
            )?,
            utilization_tolerance_pct: number(
                "CREDIT_UTILIZATION_TOLERANCE_PCT",
                defaults.utilization_tolerance_pct,
            )?,
            max_dti_pct: number("CREDIT_MAX_DTI_PCT", defaults.max_dti_pct)?,
            max_ltv_pct: number("CREDIT_MAX_LTV_PCT", defaults.max_ltv_pct)?,
        }
        .sanitized();

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            compliance,
        })
    }
}

fn number(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|source| ConfigError::InvalidNumber {
                key,
                value: raw,
                source,
            }),
        Err(_) => Ok(default),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber {
        key: &'static str,
        value: String,
        source: ParseFloatError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value, .. } => {
                write!(f, "{key} must be a number, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidNumber { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const KEYS: &[&str] = &[
        "APP_ENV",
        "APP_LOG_LEVEL",
        "CREDIT_SALARY_RULE_RATIO",
        "CREDIT_AFFORDABILITY_WARNING_RATIO",
        "CREDIT_EXPENSE_WARNING_RATIO",
        "CREDIT_UTILIZATION_WARNING_PCT",
        "CREDIT_UTILIZATION_TOLERANCE_PCT",
        "CREDIT_MAX_DTI_PCT",
        "CREDIT_MAX_LTV_PCT",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.compliance, ComplianceThresholds::default());
    }

    #[test]
    fn thresholds_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("CREDIT_SALARY_RULE_RATIO", "0.25");
        env::set_var("CREDIT_MAX_DTI_PCT", " 35 ");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.compliance.salary_rule_ratio, 0.25);
        assert_eq!(config.compliance.max_dti_pct, 35.0);
        assert_eq!(config.compliance.max_ltv_pct, 80.0);
    }

    #[test]
    fn non_positive_thresholds_fall_back_to_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CREDIT_UTILIZATION_WARNING_PCT", "-10");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.compliance.utilization_warning_pct, 80.0);
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CREDIT_MAX_LTV_PCT", "eighty");
        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::InvalidNumber { key, value, .. }) => {
                assert_eq!(key, "CREDIT_MAX_LTV_PCT");
                assert_eq!(value, "eighty");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }
}
