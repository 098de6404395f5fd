use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use domain::token_service::TokenService;
use log::{info, warn};
use service::config::Config;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
mod response;
pub mod router;

pub use error::{Error, Result};

/// State shared by every request handler.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(config: Config, token_service: Arc<TokenService>) -> Self {
        Self {
            config,
            token_service,
        }
    }

    pub fn token_service(&self) -> &TokenService {
        self.token_service.as_ref()
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(origins)
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{}:{}", interface, app_state.config.port);

    info!(
        "Server starting... listening for connections on http://{server_url} ({} mode)",
        app_state.config.runtime_env()
    );

    let cors = cors_layer(&app_state.config);
    let app = router::define_routes(app_state).layer(cors);

    let listener = TcpListener::bind(&server_url).await?;
    axum::serve(listener, app).await
}
