use anyhow::Context;
use restaurant_ranking::{
    models::RecommendRequest, Config, Dataset, HistoryStore, InMemoryHistoryStore,
    RecommendationService,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Stdin payload: a recommendation request plus visits to record first
#[derive(Debug, Deserialize)]
struct CliRequest {
    #[serde(flatten)]
    request: RecommendRequest,
    #[serde(default)]
    visited: Vec<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("Failed to load config")?;
    info!(
        service = %config.service.service_name,
        dataset = %config.dataset.path,
        "Starting restaurant ranking"
    );

    let dataset = Dataset::from_json_file(&config.dataset.path)
        .with_context(|| format!("Failed to load dataset from {}", config.dataset.path))?;
    let store: Arc<dyn HistoryStore> = Arc::new(InMemoryHistoryStore::new());
    let service = RecommendationService::new(Arc::new(dataset), store, config.ranking.clone());

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read request from stdin")?;
    let cli: CliRequest = if input.trim().is_empty() {
        CliRequest {
            request: RecommendRequest::default(),
            visited: Vec::new(),
        }
    } else {
        serde_json::from_str(&input).context("Malformed request JSON")?
    };

    if !cli.visited.is_empty() {
        match cli.request.user_id.as_deref() {
            Some(user_id) => {
                for restaurant_id in &cli.visited {
                    service.save_history(user_id, *restaurant_id).await?;
                }
            }
            None => warn!(
                visited = cli.visited.len(),
                "Ignoring visited ids without user_id"
            ),
        }
    }

    let page = service.recommend(&cli.request).await?;
    let body = serde_json::to_vec_pretty(&page).context("Failed to encode response")?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&body).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
