use std::sync::Arc;

use crate::account::repository::AccountRepository;
use crate::brands::repository::BrandRepository;
use crate::config::Config;
use crate::generation::generator::ContentGenerator;
use crate::guidelines::ingest::{DocumentSource, GuidelineSummarizer};
use crate::guidelines::repository::GuidelineRepository;
use crate::library::repository::ContentRepository;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every backend sits behind a trait object so tests can run the router
/// without Postgres, S3 or the AI gateway.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub generator: Arc<dyn ContentGenerator>,
    pub summarizer: Arc<dyn GuidelineSummarizer>,
    pub brands: Arc<dyn BrandRepository>,
    pub guidelines: Arc<dyn GuidelineRepository>,
    pub posts: Arc<dyn ContentRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub blobs: Arc<dyn BlobStore>,
    /// Fetches guideline documents by (signed) URL.
    pub documents: Arc<dyn DocumentSource>,
}
