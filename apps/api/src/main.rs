mod candidates;
mod config;
mod db;
mod errors;
mod identity;
mod intake;
mod interviews;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::candidates::PgCandidateStore;
use crate::config::{AiMode, Config, StorageBackend};
use crate::db::create_pool;
use crate::intake::{Enricher, IntakePipeline, PdfTextExtractor};
use crate::interviews::{LogNotifier, Notifier, PgInterviewStore, SmtpNotifier};
use crate::jobs::PgJobStore;
use crate::matching::AiBackend;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{LocalResumeStorage, ResumeStorage, S3ResumeStorage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Upload directories
    tokio::fs::create_dir_all(config.staging_dir())
        .await
        .with_context(|| format!("creating {}", config.staging_dir().display()))?;

    // Resume storage
    let storage: Arc<dyn ResumeStorage> = match &config.storage {
        StorageBackend::Local => {
            let dir = config.resume_dir();
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
            info!("Storing resumes under {}", dir.display());
            Arc::new(LocalResumeStorage::new(dir))
        }
        StorageBackend::S3(settings) => {
            info!("Storing resumes in S3 bucket {}", settings.bucket);
            Arc::new(S3ResumeStorage::connect(settings).await)
        }
    };

    // AI backend (offline when no API key is configured)
    let backend = AiBackend::from_config(&config.ai)?;
    match &config.ai.mode {
        AiMode::Offline => info!("OPENROUTER_API_KEY not set; AI matching runs in offline mode"),
        AiMode::Live { model, .. } => info!("AI matching enabled (model: {model})"),
    }

    // Email notifications
    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => {
            info!("Sending email through {}:{}", smtp.host, smtp.port);
            Arc::new(SmtpNotifier::new(smtp)?)
        }
        None => {
            info!("SMTP not configured; notifications are logged only");
            Arc::new(LogNotifier)
        }
    };

    let jobs = Arc::new(PgJobStore::new(db.clone()));
    let candidates = Arc::new(PgCandidateStore::new(db.clone()));
    let pipeline = IntakePipeline::new(
        jobs.clone(),
        candidates.clone(),
        storage.clone(),
        Enricher::new(Arc::new(PdfTextExtractor), backend),
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        jobs,
        candidates,
        interviews: Arc::new(PgInterviewStore::new(db)),
        storage,
        pipeline: Arc::new(pipeline),
        notifier,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
