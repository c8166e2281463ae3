//! Guideline ingestion: download → extract text → summarise → persist.
//!
//! Plain-text and Markdown are summarised verbatim. PDFs go through
//! `pdf-extract`; when that yields nothing, and for Word documents and
//! images, the model only sees a placeholder and is asked for a generic
//! template instead.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::guidelines::prompts::{document_prompt, template_prompt, GUIDELINE_SUMMARY_SYSTEM};
use crate::guidelines::repository::GuidelineRepository;
use crate::llm_client::{LlmClient, LlmError, SUMMARY_MODEL};
use crate::models::guideline::{BrandGuidelineRow, NewGuideline};

/// Stored when the model returns no summary.
pub const UNPARSED_PLACEHOLDER: &str = "Unable to parse document";

const TEXT_FILE_TYPES: [&str; 3] = ["txt", "md", "markdown"];
const IMAGE_FILE_TYPES: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];
const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

pub struct FetchedDocument {
    pub body: Bytes,
    pub content_type: String,
}

/// Where guideline bytes come from. The default reads the signed URL over HTTP.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, AppError>;
}

pub struct HttpDocumentSource {
    client: reqwest::Client,
}

impl HttpDocumentSource {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to download file: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "Failed to download file: status {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to download file: {e}")))?;

        Ok(FetchedDocument { body, content_type })
    }
}

/// What the summariser gets to see of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedDocument {
    Text(String),
    /// The content could not be read; only a description of the file.
    Placeholder(String),
}

pub fn extract_document(
    file_name: &str,
    file_type: &str,
    document: &FetchedDocument,
) -> ExtractedDocument {
    let file_type = file_type.to_lowercase();

    if document.content_type.contains("text") || TEXT_FILE_TYPES.contains(&file_type.as_str()) {
        return ExtractedDocument::Text(String::from_utf8_lossy(&document.body).into_owned());
    }

    if IMAGE_FILE_TYPES.contains(&file_type.as_str()) {
        return ExtractedDocument::Placeholder(format!("[Image file: {file_name}]"));
    }

    if file_type == "pdf" || document.content_type.contains("application/pdf") {
        match pdf_extract::extract_text_from_mem(&document.body) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Extracted {} chars from {file_name}", text.len());
                return ExtractedDocument::Text(text);
            }
            Ok(_) => warn!("No text layer in {file_name}"),
            Err(e) => warn!("PDF extraction failed for {file_name}: {e}"),
        }
    }

    ExtractedDocument::Placeholder(format!("[Document file: {file_name}, type: {file_type}]"))
}

#[async_trait]
pub trait GuidelineSummarizer: Send + Sync {
    async fn summarize(
        &self,
        file_name: &str,
        file_type: &str,
        document: &ExtractedDocument,
    ) -> Result<String, LlmError>;
}

pub struct LlmGuidelineSummarizer {
    llm: LlmClient,
}

impl LlmGuidelineSummarizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl GuidelineSummarizer for LlmGuidelineSummarizer {
    async fn summarize(
        &self,
        file_name: &str,
        file_type: &str,
        document: &ExtractedDocument,
    ) -> Result<String, LlmError> {
        let prompt = match document {
            ExtractedDocument::Text(text) => document_prompt(text),
            ExtractedDocument::Placeholder(_) => template_prompt(file_name, file_type),
        };
        self.llm
            .call_text(SUMMARY_MODEL, GUIDELINE_SUMMARY_SYSTEM, &prompt)
            .await
    }
}

/// A stored guideline file awaiting parsing.
#[derive(Debug, Clone)]
pub struct GuidelineSource {
    pub brand_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
}

/// Accepts `file_url` only when it names an object in `bucket` on one of the
/// storage origins in `bases`. Scheme, host and port must match a base, and
/// the path must sit under `<base path>/<bucket>/`.
pub fn ensure_bucket_url(file_url: &str, bases: &[&str], bucket: &str) -> Result<(), AppError> {
    let rejected = || AppError::Validation("File URL must point at the guidelines bucket".to_string());
    let target = Url::parse(file_url).map_err(|_| rejected())?;
    if !target.username().is_empty() || target.password().is_some() {
        return Err(rejected());
    }

    let allowed = bases.iter().filter_map(|base| Url::parse(base).ok()).any(|base| {
        let prefix = format!("{}/{}/", base.path().trim_end_matches('/'), bucket);
        base.scheme() == target.scheme()
            && base.host_str().is_some()
            && base.host_str() == target.host_str()
            && base.port_or_known_default() == target.port_or_known_default()
            && target.path().starts_with(&prefix)
            && target.path().len() > prefix.len()
    });
    if allowed {
        Ok(())
    } else {
        warn!("Refused guideline URL outside the storage bucket: {file_url}");
        Err(rejected())
    }
}

/// Downloads, summarises and stores one guideline document. The caller has
/// already checked that the brand belongs to the requesting user.
pub async fn ingest_guideline(
    documents: &dyn DocumentSource,
    summarizer: &dyn GuidelineSummarizer,
    guidelines: &dyn GuidelineRepository,
    source: GuidelineSource,
) -> Result<BrandGuidelineRow, AppError> {
    let fetched = documents.fetch(&source.file_url).await?;
    let extracted = extract_document(&source.file_name, &source.file_type, &fetched);

    let summary = match summarizer
        .summarize(&source.file_name, &source.file_type, &extracted)
        .await
    {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) | Err(LlmError::EmptyContent) => UNPARSED_PLACEHOLDER.to_string(),
        Err(e) => {
            warn!("Guideline summary failed for {}: {e}", source.file_name);
            return Err(AppError::from_llm("Failed to analyze document with AI", e));
        }
    };

    let row = guidelines
        .insert(NewGuideline {
            brand_id: source.brand_id,
            file_name: source.file_name,
            file_type: source.file_type,
            file_url: source.file_url,
            parsed_content: Some(summary),
        })
        .await?;

    info!("Parsed guideline {} ({})", row.id, row.file_name);
    Ok(row)
}
