/// Configuration management for Recipe Service
///
/// Loads configuration from environment variables (and `.env` when present).
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::models::MAX_RATING;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub trending: TrendingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub http_port: u16,
    pub service_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    Memory,
    Redis,
    RealtimeDb,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            "realtime-db" | "realtime_db" | "firebase" => Ok(StoreBackend::RealtimeDb),
            other => Err(anyhow!("unknown store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub redis_url: Option<String>,
    pub realtime_db_url: Option<String>,
    /// Database secret or ID token appended as `auth=`
    pub realtime_db_auth: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file; the bundled sample catalog is used when unset
    pub path: Option<String>,
}

/// How review fetches are issued across the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// One recipe at a time, awaiting each fetch before the next
    Sequential,
    /// All fetches in flight together, joined as a set
    Concurrent,
}

impl FromStr for FetchStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(FetchStrategy::Sequential),
            "concurrent" => Ok(FetchStrategy::Concurrent),
            other => Err(anyhow!("unknown fetch strategy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingConfig {
    /// Minimum inclusive average rating
    pub threshold: f64,
    /// Maximum number of trending recipes returned
    pub limit: usize,
    pub fetch_strategy: FetchStrategy,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            limit: default_limit(),
            fetch_strategy: FetchStrategy::Concurrent,
        }
    }
}

impl TrendingConfig {
    /// The threshold must be a reachable average rating
    pub fn validate(&self) -> Result<()> {
        let max = f64::from(MAX_RATING);
        if !self.threshold.is_finite() || !(0.0..=max).contains(&self.threshold) {
            return Err(anyhow!(
                "TRENDING_THRESHOLD must be between 0 and {}, got {}",
                max,
                self.threshold
            ));
        }
        Ok(())
    }
}

fn default_threshold() -> f64 {
    4.0
}

fn default_limit() -> usize {
    5
}

fn default_timeout_ms() -> u64 {
    3000
}

/// Reads `key`, falling back to `default` when unset
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow!("{} has invalid value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let service = ServiceConfig {
            host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_var("HTTP_PORT", 8012)?,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "recipe-service".to_string()),
        };

        let store = StoreConfig {
            backend: parse_var("STORE_BACKEND", StoreBackend::Memory)?,
            redis_url: env::var("REDIS_URL").ok(),
            realtime_db_url: env::var("REALTIME_DB_URL").ok(),
            realtime_db_auth: env::var("REALTIME_DB_AUTH").ok(),
            timeout_ms: parse_var("STORE_TIMEOUT_MS", default_timeout_ms())?,
        };

        match store.backend {
            StoreBackend::Redis if store.redis_url.is_none() => {
                return Err(anyhow!("REDIS_URL must be set when STORE_BACKEND=redis"));
            }
            StoreBackend::RealtimeDb if store.realtime_db_url.is_none() => {
                return Err(anyhow!(
                    "REALTIME_DB_URL must be set when STORE_BACKEND=realtime-db"
                ));
            }
            _ => {}
        }

        let catalog = CatalogConfig {
            path: env::var("CATALOG_PATH").ok(),
        };

        let trending = TrendingConfig {
            threshold: parse_var("TRENDING_THRESHOLD", default_threshold())
                .context("Failed to read trending threshold")?,
            limit: parse_var("TRENDING_LIMIT", default_limit())
                .context("Failed to read trending limit")?,
            fetch_strategy: parse_var("TRENDING_FETCH_STRATEGY", FetchStrategy::Concurrent)?,
        };
        trending.validate()?;

        Ok(Config {
            service,
            store,
            catalog,
            trending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_defaults() {
        let trending = TrendingConfig::default();
        assert_eq!(trending.threshold, 4.0);
        assert_eq!(trending.limit, 5);
        assert_eq!(trending.fetch_strategy, FetchStrategy::Concurrent);
    }

    #[test]
    fn test_trending_threshold_range() {
        assert!(TrendingConfig::default().validate().is_ok());

        for threshold in [0.0, 5.0] {
            let trending = TrendingConfig {
                threshold,
                ..TrendingConfig::default()
            };
            assert!(trending.validate().is_ok());
        }

        for threshold in [7.5, -1.0, f64::NAN, f64::INFINITY] {
            let trending = TrendingConfig {
                threshold,
                ..TrendingConfig::default()
            };
            assert!(trending.validate().is_err(), "accepted {}", threshold);
        }
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(
            "Sequential".parse::<FetchStrategy>().unwrap(),
            FetchStrategy::Sequential
        );
        assert_eq!(
            "firebase".parse::<StoreBackend>().unwrap(),
            StoreBackend::RealtimeDb
        );
        assert!("carrier-pigeon".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_parse_var_reports_bad_values() {
        std::env::set_var("RECIPE_TEST_BAD_LIMIT", "five");
        let result: Result<usize> = parse_var("RECIPE_TEST_BAD_LIMIT", 5);
        assert!(result.is_err());

        let fallback: usize = parse_var("RECIPE_TEST_UNSET_LIMIT", 7).unwrap();
        assert_eq!(fallback, 7);
    }
}
