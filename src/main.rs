mod auth;
mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod rest;
mod store;
mod structured;

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::Config, error::AppError, store::NoteStore};

#[derive(Clone)]
pub struct AppState {
    pub notes: NoteStore,
    pub upload_dir: PathBuf,
    pub http: reqwest::Client,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// One-time startup work: notes schema, upload directory, outbound client.
    pub async fn init(config: &Config) -> Result<Self, AppError> {
        let notes = NoteStore::new(config.database.clone());
        notes.init().await?;

        tokio::fs::create_dir_all(&config.upload_dir).await?;

        let http = handlers::proxy::client(config.proxy_timeout)?;

        Ok(AppState {
            notes,
            upload_dir: config.upload_dir.clone(),
            http,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "notes_server=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::init(&config).await?;
    tracing::info!("Uploads stored in {}", config.upload_dir.display());

    let app = rest::router(app_state);
    tracing::info!("REST API listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
