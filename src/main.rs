mod api;
mod hf;
mod layout;
mod openapi;
mod prompt;
mod services;
mod util;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub struct AppState {
    pub http: reqwest::Client,
    pub hf: hf::HfConfig,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("BACKEND_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let state = Arc::new(AppState {
        http: reqwest::Client::new(),
        hf: hf::HfConfig::from_env(),
    });

    let openapi = openapi::ApiDoc::openapi();

    let app = Router::new()
        // Swagger UI + OpenAPI schema
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi))
        // API
        .route("/", get(api::home))
        .route("/health", get(api::health))
        .route("/analyze-image", post(api::analyze_image))
        .route("/generate-slogan", post(api::generate_slogan))
        .route("/generate-poster", post(api::generate_poster))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("bind addr");
    info!("Starting postergen-backend on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind listener");
    axum::serve(listener, app).await.expect("server run");
}
