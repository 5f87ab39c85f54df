pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use dataset::Dataset;
pub use error::{RankingError, Result};
pub use services::{
    filter_and_rank, nearest, paginate, rank_by_content, rank_by_history, HistoryStore,
    InMemoryHistoryStore, RecommendationService,
};
