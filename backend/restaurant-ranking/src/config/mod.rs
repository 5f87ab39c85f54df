use crate::error::{RankingError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub dataset: DatasetConfig,
    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Cleaned restaurant table produced by the ETL step (JSON array)
    pub path: String,
}

/// Pagination bounds, read from `RANKING_*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

fn default_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    100
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 {
            return Err(RankingError::Config(
                "RANKING_DEFAULT_LIMIT must be at least 1".to_string(),
            ));
        }
        if self.default_limit > self.max_limit {
            return Err(RankingError::Config(format!(
                "RANKING_DEFAULT_LIMIT ({}) exceeds RANKING_MAX_LIMIT ({})",
                self.default_limit, self.max_limit
            )));
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let ranking: RankingConfig = envy::prefixed("RANKING_").from_env()?;
        ranking.validate()?;

        Ok(Config {
            service: ServiceConfig {
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "restaurant-ranking".to_string()),
            },
            dataset: DatasetConfig {
                path: env::var("DATASET_PATH")
                    .unwrap_or_else(|_| "data/restaurants.json".to_string()),
            },
            ranking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking_from(vars: &[(&str, &str)]) -> std::result::Result<RankingConfig, envy::Error> {
        envy::prefixed("RANKING_").from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_ranking_defaults() {
        let config = ranking_from(&[]).unwrap();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ranking_overrides() {
        let config =
            ranking_from(&[("RANKING_DEFAULT_LIMIT", "25"), ("RANKING_MAX_LIMIT", "50")]).unwrap();
        assert_eq!(config.default_limit, 25);
        assert_eq!(config.max_limit, 50);
    }

    #[test]
    fn test_default_above_max_rejected() {
        let config = RankingConfig {
            default_limit: 200,
            max_limit: 100,
        };
        assert!(matches!(config.validate(), Err(RankingError::Config(_))));
    }

    #[test]
    fn test_unparseable_limit() {
        let err = ranking_from(&[("RANKING_MAX_LIMIT", "lots")]).unwrap_err();
        assert!(matches!(RankingError::from(err), RankingError::Config(_)));
    }
}
