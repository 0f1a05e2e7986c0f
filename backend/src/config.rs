//! Runtime configuration read from the environment.

use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use chrono::Datelike;

use crate::error_log::ErrorLogConfig;

const DEFAULT_SOLR_BASE_URL: &str = "http://localhost:8983/solr/patents";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_AGGREGATION_TIMEOUT_SECS: u64 = 120;
const DEFAULT_ERROR_LOG_PATH: &str = "logs/exception/api_exceptions.txt";
const DEFAULT_ERROR_LOG_MAX_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_ERROR_LOG_BACKUPS: usize = 5;

/// Inclusive application-year bounds used by the `last_10_years` search type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    pub fn last_decade(current_year: i32) -> Self {
        YearRange { from: current_year - 10, to: current_year }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub solr_base_url: String,
    pub bind_addr: String,
    pub lookup_timeout: Duration,
    pub aggregation_timeout: Duration,
    pub last_10_years: YearRange,
    pub log_level: tracing::Level,
    /// ERROR-level file sink; `None` when `ERROR_LOG_PATH` is set empty.
    pub error_log: Option<ErrorLogConfig>,
}

impl SearchConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let solr_base_url = lookup("SOLR_BASE_URL")
            .unwrap_or(DEFAULT_SOLR_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if solr_base_url.is_empty() {
            anyhow::bail!("SOLR_BASE_URL is empty");
        }
        let bind_addr = lookup("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.to_string());

        let lookup_timeout = parse_or(&lookup, "SOLR_LOOKUP_TIMEOUT_SECS", DEFAULT_LOOKUP_TIMEOUT_SECS)?;
        let aggregation_timeout =
            parse_or(&lookup, "SOLR_AGGREGATION_TIMEOUT_SECS", DEFAULT_AGGREGATION_TIMEOUT_SECS)?;
        if lookup_timeout == 0 || aggregation_timeout == 0 {
            anyhow::bail!("search engine timeouts must be positive");
        }

        let default_years = YearRange::last_decade(chrono::Utc::now().year());
        let last_10_years = YearRange {
            from: parse_or(&lookup, "LAST_10_YEARS_FROM", default_years.from)?,
            to: parse_or(&lookup, "LAST_10_YEARS_TO", default_years.to)?,
        };
        if last_10_years.from > last_10_years.to {
            anyhow::bail!(
                "LAST_10_YEARS_FROM ({}) is after LAST_10_YEARS_TO ({})",
                last_10_years.from,
                last_10_years.to
            );
        }

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => tracing::Level::from_str(level.trim())
                .map_err(|e| anyhow::anyhow!("invalid LOG_LEVEL {level:?}: {e}"))?,
            None => tracing::Level::INFO,
        };

        let error_log_path = lookup("ERROR_LOG_PATH").unwrap_or(DEFAULT_ERROR_LOG_PATH.to_string());
        let error_log = match error_log_path.trim() {
            "" => None,
            path => {
                let max_bytes = parse_or(&lookup, "ERROR_LOG_MAX_BYTES", DEFAULT_ERROR_LOG_MAX_BYTES)?;
                if max_bytes == 0 {
                    anyhow::bail!("ERROR_LOG_MAX_BYTES must be positive");
                }
                let backups = parse_or(&lookup, "ERROR_LOG_BACKUPS", DEFAULT_ERROR_LOG_BACKUPS)?;
                Some(ErrorLogConfig { path: PathBuf::from(path), max_bytes, backups })
            }
        };

        Ok(SearchConfig {
            solr_base_url,
            bind_addr,
            lookup_timeout: Duration::from_secs(lookup_timeout),
            aggregation_timeout: Duration::from_secs(aggregation_timeout),
            last_10_years,
            log_level,
            error_log,
        })
    }

    pub fn solr_select_url(&self) -> String {
        format!("{}/select", self.solr_base_url)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<SearchConfig> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        SearchConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.solr_select_url(), "http://localhost:8983/solr/patents/select");
        assert_eq!(config.lookup_timeout, Duration::from_secs(30));
        assert_eq!(config.aggregation_timeout, Duration::from_secs(120));
        assert_eq!(config.last_10_years.to - config.last_10_years.from, 10);
        assert_eq!(config.log_level, tracing::Level::INFO);
    }

    #[test]
    fn year_range_comes_from_one_place() {
        let config = config_from(&[("LAST_10_YEARS_FROM", "2015"), ("LAST_10_YEARS_TO", "2025")]).unwrap();
        assert_eq!(config.last_10_years, YearRange { from: 2015, to: 2025 });
    }

    #[test]
    fn rejects_inverted_year_range() {
        assert!(config_from(&[("LAST_10_YEARS_FROM", "2025"), ("LAST_10_YEARS_TO", "2015")]).is_err());
    }

    #[test]
    fn rejects_garbage_numbers() {
        assert!(config_from(&[("SOLR_LOOKUP_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("SOLR_AGGREGATION_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("LOG_LEVEL", "loud")]).is_err());
    }

    #[test]
    fn error_log_defaults_and_opt_out() {
        let config = config_from(&[]).unwrap();
        assert_eq!(
            config.error_log,
            Some(ErrorLogConfig {
                path: PathBuf::from("logs/exception/api_exceptions.txt"),
                max_bytes: 10 * 1024 * 1024,
                backups: 5,
            })
        );
        let config = config_from(&[("ERROR_LOG_PATH", " ")]).unwrap();
        assert_eq!(config.error_log, None);
        assert!(config_from(&[("ERROR_LOG_MAX_BYTES", "0")]).is_err());
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let config = config_from(&[("SOLR_BASE_URL", "http://solr:8983/solr/core/")]).unwrap();
        assert_eq!(config.solr_select_url(), "http://solr:8983/solr/core/select");
    }
}
