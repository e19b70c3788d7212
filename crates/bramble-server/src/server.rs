use std::sync::Arc;

use tokio::net::TcpListener;

use bramble_engine::{Bookshelf, MediaStore};

use crate::auth::AllowAllAuth;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Bramble HTTP server.
pub struct BrambleServer {
    config: ServerConfig,
}

impl BrambleServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Assemble the shared state: a fresh shelf over the configured audio
    /// root and the development auth provider.
    pub fn app_state(&self) -> Arc<AppState> {
        let media = MediaStore::with_public_base(
            self.config.audio_root.clone(),
            self.config.public_audio_base.clone(),
        );
        Arc::new(AppState {
            config: self.config.clone(),
            shelf: Bookshelf::new(media),
            auth: Box::new(AllowAllAuth),
        })
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.app_state())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("bramble server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
