use std::sync::Arc;

use tokio::signal;
use tracing::info;

use abi::config::{Config, ServerConfig};
use abi::errors::Result;
use db::DbRepo;

use crate::mail::{LogMailer, Mailer};

mod api_utils;
pub(crate) mod handlers;
pub mod mail;
pub mod routes;

#[cfg(test)]
mod tests;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Arc<DbRepo>,
    pub mailer: Arc<dyn Mailer>,
    pub jwt_secret: String,
    /// where the web client lives; redirects land there
    pub client_url: String,
    /// base of the links put into mails
    pub public_url: String,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let db = DbRepo::new(config).await?;
        Ok(Self::with_parts(db, Arc::new(LogMailer), &config.server))
    }

    pub fn with_parts(db: DbRepo, mailer: Arc<dyn Mailer>, server: &ServerConfig) -> Self {
        Self {
            db: Arc::new(db),
            mailer,
            jwt_secret: server.jwt_secret.clone(),
            client_url: server.client_url.trim_end_matches('/').to_string(),
            public_url: server.public_url.trim_end_matches('/').to_string(),
        }
    }
}

pub async fn start(config: Config) -> Result<()> {
    let state = AppState::new(&config).await?;
    let app = routes::app_routes(state);
    let listener = tokio::net::TcpListener::bind(&config.server.server_url()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
