pub mod content;
pub mod filters;
pub mod geo;
pub mod history;
pub mod history_store;
pub mod orchestrator;
pub mod recommendation;
pub mod vectorizer;

pub use content::rank_by_content;
pub use filters::{apply_preference_filters, matches_preferences, LocationFilter};
pub use geo::nearest;
pub use history::rank_by_history;
pub use history_store::{HistoryStore, InMemoryHistoryStore};
pub use orchestrator::{filter_and_rank, paginate};
pub use recommendation::RecommendationService;
pub use vectorizer::{cosine_similarity, score_against, TfidfVectorizer};
