use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;

use crate::models::MccPolicy;
use crate::server::ApiKeys;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

/// Runtime settings, read from `AUTHORIZER_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub api_keys: ApiKeys,
    pub log_level: LevelFilter,
    pub store_timeout: Duration,
    pub mcc_policy: MccPolicy,
    pub conflict_retries: u32,
    pub seed: Option<String>
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source, unset variables taking their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>
    {
        let bind = lookup("AUTHORIZER_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = SocketAddr::from_str(&bind)
            .with_context(|| format!("AUTHORIZER_BIND is not a socket address: {bind}"))?;

        let api_keys = ApiKeys::new(
            lookup("AUTHORIZER_API_KEYS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
        );

        let log_level = lookup("AUTHORIZER_LOG_LEVEL")
            .map(|level| parse_log_level(&level))
            .unwrap_or(LevelFilter::INFO);

        let store_timeout = match lookup("AUTHORIZER_STORE_TIMEOUT_MS") {
            Some(value) => value.trim().parse()
                .with_context(|| format!("AUTHORIZER_STORE_TIMEOUT_MS is not a number of milliseconds: {value}"))?,
            None => DEFAULT_STORE_TIMEOUT_MS
        };

        let mcc_policy = match lookup("AUTHORIZER_MCC_POLICY") {
            Some(value) => MccPolicy::from_str(&value).map_err(anyhow::Error::msg)?,
            None => MccPolicy::default()
        };

        let conflict_retries = match lookup("AUTHORIZER_CONFLICT_RETRIES") {
            Some(value) => value.trim().parse()
                .with_context(|| format!("AUTHORIZER_CONFLICT_RETRIES is not a count: {value}"))?,
            None => 0
        };

        Ok(Self {
            bind,
            api_keys,
            log_level,
            store_timeout: Duration::from_millis(store_timeout),
            mcc_policy,
            conflict_retries,
            seed: lookup("AUTHORIZER_SEED").filter(|path| !path.trim().is_empty())
        })
    }
}

pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_log_level};

    use std::collections::HashMap;
    use std::time::Duration;

    use anyhow::Result;
    use tracing::level_filters::LevelFilter;

    use crate::models::MccPolicy;

    fn config_from(variables: &[(&str, &str)]) -> Result<Config> {
        let variables: HashMap<String, String> = variables.iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Config::from_lookup(|name| variables.get(name).cloned())
    }

    #[test]
    fn test_defaults_apply_when_nothing_is_set() -> Result<()> {
        let config = config_from(&[])?;

        assert_eq!(config.bind.to_string(), "127.0.0.1:8080");
        assert!(config.api_keys.is_empty());
        assert_eq!(config.log_level, LevelFilter::INFO);
        assert_eq!(config.store_timeout, Duration::from_millis(2000));
        assert_eq!(config.mcc_policy, MccPolicy::Fallback);
        assert_eq!(config.conflict_retries, 0);
        assert!(config.seed.is_none());

        Ok(())
    }

    #[test]
    fn test_variables_override_defaults() -> Result<()> {
        let config = config_from(&[
            ("AUTHORIZER_BIND", "0.0.0.0:9000"),
            ("AUTHORIZER_API_KEYS", "alpha, beta,,"),
            ("AUTHORIZER_LOG_LEVEL", "DEBUG"),
            ("AUTHORIZER_STORE_TIMEOUT_MS", "150"),
            ("AUTHORIZER_MCC_POLICY", "strict"),
            ("AUTHORIZER_CONFLICT_RETRIES", "3"),
            ("AUTHORIZER_SEED", "balances.csv")
        ])?;

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.api_keys.len(), 2);
        assert!(config.api_keys.contains("beta"));
        assert_eq!(config.log_level, LevelFilter::DEBUG);
        assert_eq!(config.store_timeout, Duration::from_millis(150));
        assert_eq!(config.mcc_policy, MccPolicy::Strict);
        assert_eq!(config.conflict_retries, 3);
        assert_eq!(config.seed.as_deref(), Some("balances.csv"));

        Ok(())
    }

    #[test]
    fn test_unparsable_values_are_startup_errors() {
        assert!(config_from(&[("AUTHORIZER_BIND", "localhost")]).is_err());
        assert!(config_from(&[("AUTHORIZER_STORE_TIMEOUT_MS", "soon")]).is_err());
        assert!(config_from(&[("AUTHORIZER_MCC_POLICY", "lenient")]).is_err());
        assert!(config_from(&[("AUTHORIZER_CONFLICT_RETRIES", "-1")]).is_err());
    }

    #[test]
    fn test_invalid_log_level_falls_back_to_info() {
        assert_eq!(parse_log_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_log_level("verbose"), LevelFilter::INFO);
    }
}
