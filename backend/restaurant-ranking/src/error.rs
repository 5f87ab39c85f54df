use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("History store error: {0}")]
    HistoryStore(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<envy::Error> for RankingError {
    fn from(err: envy::Error) -> Self {
        RankingError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RankingError {
    fn from(err: serde_json::Error) -> Self {
        RankingError::DataUnavailable(format!("malformed dataset: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, RankingError>;
