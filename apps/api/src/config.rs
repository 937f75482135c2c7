use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_AI_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_AI_MODEL: &str = "deepseek/deepseek-chat";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub ai: AiConfig,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Public URL prefix under which stored resumes are served.
    pub resume_public_base: String,
    pub storage: StorageBackend,
    pub smtp: Option<SmtpSettings>,
}

/// Whether the matching clients talk to the remote model or use fallbacks only.
/// Decided once at startup from the presence of `OPENROUTER_API_KEY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiMode {
    Offline,
    Live {
        api_key: String,
        endpoint: String,
        model: String,
    },
}

impl AiMode {
    /// A missing or blank key selects offline mode.
    pub fn from_api_key(api_key: Option<String>, endpoint: String, model: String) -> Self {
        match api_key {
            Some(key) if !key.trim().is_empty() => AiMode::Live {
                api_key: key.trim().to_string(),
                endpoint,
                model,
            },
            _ => AiMode::Offline,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub mode: AiMode,
    pub timeout: Duration,
    pub breaker_threshold: u32,
    pub breaker_cooldown: Duration,
}

#[derive(Debug, Clone)]
pub enum StorageBackend {
    Local,
    S3(S3Settings),
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub from_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ai = AiConfig {
            mode: AiMode::from_api_key(
                optional_env("OPENROUTER_API_KEY"),
                optional_env("AI_ENDPOINT").unwrap_or_else(|| DEFAULT_AI_ENDPOINT.to_string()),
                optional_env("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            ),
            timeout: Duration::from_secs(parse_env("AI_TIMEOUT_SECS", 30)?),
            breaker_threshold: parse_env("AI_BREAKER_THRESHOLD", 5)?,
            breaker_cooldown: Duration::from_secs(parse_env("AI_BREAKER_COOLDOWN_SECS", 30)?),
        };

        let storage = match optional_env("S3_BUCKET") {
            Some(bucket) => StorageBackend::S3(S3Settings {
                bucket,
                endpoint: optional_env("S3_ENDPOINT"),
                region: optional_env("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            None => StorageBackend::Local,
        };

        let smtp = match optional_env("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host,
                port: parse_env("SMTP_PORT", 587)?,
                username: require_env("SMTP_USER")?,
                password: require_env("SMTP_PASSWORD")?,
                from_name: optional_env("FROM_NAME").unwrap_or_else(|| "HireFlow".to_string()),
                from_email: require_env("FROM_EMAIL")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ai,
            upload_dir: PathBuf::from(
                optional_env("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            ),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            resume_public_base: optional_env("RESUME_PUBLIC_BASE")
                .unwrap_or_else(|| "/uploads".to_string()),
            storage,
            smtp,
        })
    }

    /// In-flight uploads; every file here belongs to a live request.
    pub fn staging_dir(&self) -> PathBuf {
        self.upload_dir.join(".staging")
    }

    /// Stored resumes for the local backend.
    pub fn resume_dir(&self) -> PathBuf {
        self.upload_dir.join("resumes")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
