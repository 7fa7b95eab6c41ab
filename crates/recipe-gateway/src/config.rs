//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. YAML config file (`--config`)
//! 3. Legacy backend variables `RECIPE_LOCAL_URL`, `NUTRITION_LOCAL_URL`,
//!    `MEALPLAN_LOCAL_URL`
//! 4. Environment variables (`GATEWAY_*` prefix)
//!
//! The loaded [`GatewayConfig`] is validated once and then only read.

use chrono::NaiveDate;
use fanout_framework::RetryPolicy;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Environment variable prefix for config overrides.
///
/// Example: `GATEWAY_REQUEST_TIMEOUT_MS=2000` -> `request_timeout_ms`
const ENV_PREFIX: &str = "GATEWAY_";

const LEGACY_URL_VARS: [(&str, &str); 3] = [
    ("RECIPE_LOCAL_URL", "recipe_url"),
    ("NUTRITION_LOCAL_URL", "nutrition_url"),
    ("MEALPLAN_LOCAL_URL", "meal_plan_url"),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),

    #[error("`{field}` is not set")]
    MissingUrl { field: &'static str },

    #[error("`{field}` = {value:?} is not a usable backend URL: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("`request_timeout_ms` must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub recipe_url: String,
    pub nutrition_url: String,
    pub meal_plan_url: String,
    /// Budget for one composite request, covering every backend call it makes.
    pub request_timeout_ms: u64,
    /// Extra attempts for reads that failed to connect. Writes never retry.
    pub read_retries: u32,
    pub retry_backoff_ms: u64,
    /// Meal-plan day used when a request does not name one.
    pub meal_plan_date: NaiveDate,
    pub bind_addr: SocketAddr,
    pub pool_max_idle_per_host: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            recipe_url: String::new(),
            nutrition_url: String::new(),
            meal_plan_url: String::new(),
            request_timeout_ms: 5_000,
            read_retries: 0,
            retry_backoff_ms: 50,
            meal_plan_date: NaiveDate::from_ymd_opt(2024, 10, 30).unwrap_or_default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5006)),
            pool_max_idle_per_host: 10,
        }
    }
}

impl GatewayConfig {
    /// Loads and validates configuration, reading `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        info!(path = ?path.map(Path::display), "Loading configuration");
        let config: GatewayConfig = Self::figment(path)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;
        config.validate()?;
        debug!(
            recipe_url = %config.recipe_url,
            nutrition_url = %config.nutrition_url,
            meal_plan_url = %config.meal_plan_url,
            timeout_ms = config.request_timeout_ms,
            bind_addr = %config.bind_addr,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(GatewayConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(legacy_env()).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("recipe_url", &self.recipe_url)?;
        validate_url("nutrition_url", &self.nutrition_url)?;
        validate_url("meal_plan_url", &self.meal_plan_url)?;
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn read_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.read_retries, Duration::from_millis(self.retry_backoff_ms))
    }
}

fn legacy_env() -> Env {
    let vars = LEGACY_URL_VARS.map(|(var, _)| var);
    Env::raw().only(&vars).map(|key| {
        match LEGACY_URL_VARS
            .iter()
            .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
        {
            Some((_, field)) => (*field).into(),
            None => key.into(),
        }
    })
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingUrl { field });
    }
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("no host".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const URLS: &str = r#"
recipe_url: "http://recipes:8000"
nutrition_url: "http://nutrition:8001"
meal_plan_url: "http://mealplan:8002"
"#;

    #[test]
    fn test_yaml_file_over_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("gateway.yaml", URLS)?;

            let config = GatewayConfig::load(Some(Path::new("gateway.yaml"))).unwrap();

            assert_eq!(config.recipe_url, "http://recipes:8000");
            assert_eq!(config.request_timeout(), Duration::from_secs(5));
            assert_eq!(config.bind_addr.port(), 5006);
            assert_eq!(config.meal_plan_date.to_string(), "2024-10-30");
            assert_eq!(config.read_retry_policy(), RetryPolicy::NONE);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("gateway.yaml", URLS)?;
            jail.set_env("GATEWAY_REQUEST_TIMEOUT_MS", "250");
            jail.set_env("GATEWAY_MEAL_PLAN_URL", "https://mealplan.internal");

            let config = GatewayConfig::load(Some(Path::new("gateway.yaml"))).unwrap();

            assert_eq!(config.request_timeout(), Duration::from_millis(250));
            assert_eq!(config.meal_plan_url, "https://mealplan.internal");
            Ok(())
        });
    }

    #[test]
    fn test_legacy_variables_supply_urls() {
        Jail::expect_with(|jail| {
            jail.set_env("RECIPE_LOCAL_URL", "http://localhost:8000");
            jail.set_env("NUTRITION_LOCAL_URL", "http://localhost:8001");
            jail.set_env("MEALPLAN_LOCAL_URL", "http://localhost:8002");

            let config = GatewayConfig::load(None).unwrap();

            assert_eq!(config.recipe_url, "http://localhost:8000");
            assert_eq!(config.nutrition_url, "http://localhost:8001");
            assert_eq!(config.meal_plan_url, "http://localhost:8002");
            Ok(())
        });
    }

    #[test]
    fn test_missing_url_is_rejected() {
        Jail::expect_with(|_jail| {
            let err = GatewayConfig::load(None).unwrap_err();
            assert!(matches!(err, ConfigError::MissingUrl { field: "recipe_url" }));
            Ok(())
        });
    }

    #[test]
    fn test_validation() {
        let mut config = GatewayConfig {
            recipe_url: "http://recipes:8000".into(),
            nutrition_url: "http://nutrition:8001".into(),
            meal_plan_url: "ftp://mealplan".into(),
            ..GatewayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { field: "meal_plan_url", .. })
        ));

        config.meal_plan_url = "http://mealplan:8002".into();
        config.request_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }
}
