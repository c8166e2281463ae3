use anyhow::{Context, Result};

const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub s3_endpoint: String,
    /// Base used to build public media URLs. Defaults to `s3_endpoint`.
    pub s3_public_url: String,
    pub s3_media_bucket: String,
    pub s3_guidelines_bucket: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub ai_gateway_url: String,
    pub ai_gateway_api_key: String,
    pub jwt_secret: String,
    pub signed_url_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: optional_env("DB_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            s3_public_url: std::env::var("S3_PUBLIC_URL").unwrap_or_else(|_| s3_endpoint.clone()),
            s3_endpoint,
            s3_media_bucket: optional_env("S3_MEDIA_BUCKET", "content-media"),
            s3_guidelines_bucket: optional_env("S3_GUIDELINES_BUCKET", "brand-guidelines"),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            ai_gateway_url: optional_env("AI_GATEWAY_URL", DEFAULT_AI_GATEWAY_URL),
            ai_gateway_api_key: require_env("AI_GATEWAY_API_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            signed_url_ttl_secs: optional_env("SIGNED_URL_TTL_SECS", "3600")
                .parse::<u64>()
                .context("SIGNED_URL_TTL_SECS must be a number of seconds")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests; no external service is contacted.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/brandcast_test".to_string(),
            db_max_connections: 1,
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_public_url: "http://localhost:9000".to_string(),
            s3_media_bucket: "content-media".to_string(),
            s3_guidelines_bucket: "brand-guidelines".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            ai_gateway_url: DEFAULT_AI_GATEWAY_URL.to_string(),
            ai_gateway_api_key: "test".to_string(),
            jwt_secret: "router-test-secret".to_string(),
            signed_url_ttl_secs: 3600,
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}
