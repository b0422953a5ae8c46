//! HTTP server for motionlog.
//!
//! Routes:
//! - `GET /` renders the motion log page.
//! - `POST /api/resource` ingests one motion event.
//!
//! Anything else gets axum's default 404.

mod error;
mod handlers;
mod view;

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;

pub use error::{ApiError, BadRequest};
pub use handlers::{IngestRequest, IngestResponse, INGEST_MESSAGE};

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database file each request opens.
    pub database_path: Arc<PathBuf>,
}

impl AppState {
    /// Create handler state for the given database file.
    #[must_use]
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Arc::new(database_path.into()),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::listing))
        .route("/api/resource", post(handlers::ingest))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A bound, ready-to-serve HTTP server.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Initialize storage and bind the listener described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the database cannot
    /// be initialized, or the address cannot be bound.
    pub async fn bind(config: &Config) -> Result<Self> {
        let addr = config.socket_addr()?;
        let database_path = config.database_path();

        let init_path = database_path.clone();
        tokio::task::spawn_blocking(move || Storage::open(&init_path)?.initialize())
            .await
            .map_err(std::io::Error::other)??;

        let listener = TcpListener::bind(addr).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        Ok(Self {
            listener,
            state: AppState::new(database_path),
        })
    }

    /// The address actually bound (useful when the configured port is 0).
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails while accepting connections.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    #[test]
    fn test_app_state_shares_path() {
        let state = AppState::new("/tmp/motion.db");
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.database_path, &cloned.database_path));
        assert_eq!(cloned.database_path.as_path(), PathBuf::from("/tmp/motion.db"));
    }

    #[tokio::test]
    async fn test_bind_initializes_database() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.storage.database_path = dir.path().join("motion_logs.db");

        let server = Server::bind(&config).await.unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);

        let storage = Storage::open(config.database_path()).unwrap();
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bind_rejects_invalid_host() {
        let mut config = Config::default();
        config.server.host = "localhost".to_string();

        let err = Server::bind(&config).await.unwrap_err();
        assert!(matches!(err, crate::Error::ConfigValidation { .. }));
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.storage.database_path = dir.path().join("motion_logs.db");

        let server = Server::bind(&config).await.unwrap();
        server.serve(async {}).await.unwrap();
    }
}
