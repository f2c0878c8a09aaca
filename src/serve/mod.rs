use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use axum_server::Server;
use serde::Deserialize;
use tracing::info;
use utoipa::OpenApi;

use crate::error::Error;
use crate::lookup::TokenLookupService;
use crate::storage::tokens::RocksTokenStore;

pub mod error;
mod openapi;
pub mod routes;
pub mod types;

pub static DEFAULT_SERVE_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Deserialize, Debug)]
pub struct ServerConfig {
    pub address: Option<String>,
}

pub type AppState = Arc<TokenLookupService<RocksTokenStore>>;

pub async fn run(
    service: TokenLookupService<RocksTokenStore>,
    address: &str,
) -> Result<(), Error> {
    let app_state = Arc::new(service);

    let app = Router::new()
        .route("/", get(root))
        .route("/openapi.json", get(openapi_json))
        .route("/lookup", post(routes::lookup::lookup))
        .nest("/outputs", routes::outputs::router())
        .with_state(app_state);

    let addr = address
        .parse::<SocketAddr>()
        .map_err(|e| Error::Config(format!("invalid server address '{address}': {e}")))?;

    info!("api listening on {}...", addr);

    Server::bind(addr).serve(app.into_make_service()).await?;

    Ok(())
}

async fn root() -> &'static str {
    "Pushdrop Lookup API Server"
}

async fn openapi_json() -> impl IntoResponse {
    Json(openapi::APIDoc::openapi())
}
