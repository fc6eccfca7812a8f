//! # HTTP Server
//!
//! Binds the catalog router and serves it until a shutdown signal arrives.

use std::future::Future;

use axum::http::HeaderValue;
use axum::Router;
use bookshelf_core::CatalogStore;
use log::{info, warn};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::ServerConfig;
use super::routes::{catalog_routes, AppState};

/// HTTP server for the book catalog
pub struct CatalogServer {
    config: ServerConfig,
    router: Router,
}

impl CatalogServer {
    /// Create a server over an already opened store
    pub fn new(config: ServerConfig, store: CatalogStore) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    fn build_router(config: &ServerConfig, store: CatalogStore) -> Router {
        let router = catalog_routes(AppState::new(store));
        match cors_layer(&config.cors_origins) {
            Some(cors) => router.layer(cors),
            None => router,
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Consumes the server, returning the router with CORS applied.
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves; in-flight requests are drained first.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        info!(
            "event=server_start module=api status=ok addr={} db_path={}",
            listener.local_addr()?,
            self.config.db_path.display()
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("event=server_stop module=api status=ok");
        Ok(())
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("event=cors_config module=api status=skipped origin={origin}");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
