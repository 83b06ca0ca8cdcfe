mod assessment;
mod config;
mod db;
mod errors;
mod evaluation;
mod llm_client;
mod models;
mod profiles;
mod ranking;
mod routes;
mod scoring;
mod state;
mod store;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::AssessmentOrchestrator;
use crate::config::Config;
use crate::db::create_pool;
use crate::evaluation::QualitativeEvaluator;
use crate::llm_client::{EmbeddingSettings, LlmClient, LlmService};
use crate::profiles::ProfileService;
use crate::ranking::summary::PoolSummarizer;
use crate::ranking::RankingOrchestrator;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{Collections, EntityStore, PgEntityStore, PgVectorStore, VectorStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or invalid env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (entities + pgvector embeddings)
    let db = create_pool(&config.database_url).await?;
    let entities: Arc<dyn EntityStore> = Arc::new(PgEntityStore::new(db.clone()));
    let vectors: Arc<dyn VectorStore> = Arc::new(PgVectorStore::new(db));

    // Initialize LLM client
    let embedding = config.embedding_api_key.clone().map(|api_key| EmbeddingSettings {
        api_key,
        model: config.embedding_model.clone(),
    });
    if embedding.is_none() {
        warn!("EMBEDDING_API_KEY not set: embedding generation disabled");
    }
    let llm: Arc<dyn LlmService> =
        Arc::new(LlmClient::new(config.anthropic_api_key.clone(), embedding)?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let collections = Collections {
        candidates: config.candidate_collection.clone(),
        jobs: config.job_collection.clone(),
    };

    // Scoring services, wired explicitly
    let assessor = Arc::new(AssessmentOrchestrator::new(
        entities.clone(),
        vectors.clone(),
        QualitativeEvaluator::new(llm.clone()),
        config.scoring,
        collections.clone(),
    ));
    let ranker = Arc::new(RankingOrchestrator::new(
        assessor.clone(),
        entities.clone(),
        vectors.clone(),
        PoolSummarizer::new(llm.clone()),
        collections.clone(),
        config.ranking_concurrency,
    ));
    let profiles = Arc::new(ProfileService::new(
        entities.clone(),
        vectors,
        llm,
        collections,
    ));
    info!(
        "Scoring weights: {:?}, ranking concurrency: {}",
        config.scoring.weights, config.ranking_concurrency
    );

    // Build app state
    let state = AppState {
        config: Arc::new(config.clone()),
        entities,
        assessor,
        ranker,
        profiles,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
