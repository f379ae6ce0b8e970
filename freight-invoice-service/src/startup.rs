use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::metrics_middleware;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: ServiceConfig,
    /// Raw logo bytes, read once at startup and reused for every render.
    pub logo: Option<Arc<Vec<u8>>>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: ServiceConfig) -> Result<Self, AppError> {
        let logo = match &config.branding.logo_path {
            Some(path) => match tokio::fs::read(path).await {
                Ok(bytes) => {
                    tracing::info!(path = %path, size = bytes.len(), "Loaded logo image");
                    Some(Arc::new(bytes))
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path,
                        error = %e,
                        "Could not load logo image, invoices will render without it"
                    );
                    None
                }
            },
            None => None,
        };

        let state = AppState {
            config: config.clone(),
            logo,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route("/line-items/validate", post(handlers::validate_line_item))
            .route("/line-items/import", post(handlers::import_line_items))
            .route("/line-items/sample", get(handlers::download_sample))
            .route("/invoices/pdf", post(handlers::generate_invoice))
            .layer(from_fn(metrics_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
