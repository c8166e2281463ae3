mod account;
mod auth;
mod brands;
mod brief;
mod config;
mod craft;
mod db;
mod errors;
mod finalize;
mod generation;
mod guidelines;
mod library;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::account::repository::PgAccountRepository;
use crate::brands::repository::PgBrandRepository;
use crate::config::Config;
use crate::db::create_pool;
use crate::generation::generator::LlmContentGenerator;
use crate::guidelines::ingest::{HttpDocumentSource, LlmGuidelineSummarizer};
use crate::guidelines::repository::PgGuidelineRepository;
use crate::library::repository::PgContentRepository;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3BlobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Brandcast API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized ({})", config.s3_endpoint);

    let llm = LlmClient::new(config.ai_gateway_url.clone(), config.ai_gateway_api_key.clone())?;
    info!(
        "LLM client initialized (generation: {}, summaries: {})",
        llm_client::GENERATION_MODEL,
        llm_client::SUMMARY_MODEL
    );

    let state = AppState {
        config: config.clone(),
        generator: Arc::new(LlmContentGenerator::new(llm.clone())),
        summarizer: Arc::new(LlmGuidelineSummarizer::new(llm)),
        brands: Arc::new(PgBrandRepository::new(db.clone())),
        guidelines: Arc::new(PgGuidelineRepository::new(db.clone())),
        posts: Arc::new(PgContentRepository::new(db.clone())),
        accounts: Arc::new(PgAccountRepository::new(db)),
        blobs: Arc::new(S3BlobStore::new(s3, config.s3_public_url.clone())),
        documents: Arc::new(HttpDocumentSource::new()?),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (local) or AWS (production), using
/// path-style bucket addressing.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "brandcast-static",
    );

    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
