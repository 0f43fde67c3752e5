//! 検出リレーサーバー
//!
//! ブラウザ/CLIからのmultipartリクエストをモデルサービスへそのまま転送する。
//! 照合ロジックは持たない。
//!
//! - `GET /health`
//! - `POST /analyze-bin`（`image` + `binData`）

pub mod error;
mod routes;

use crate::error::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use routes::{analyze_bin_handler, health_handler};

/// アップロードの上限（画像1枚 + binData）
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct RelayState {
    pub(crate) client: reqwest::Client,
    pub(crate) model_api_url: Option<String>,
}

impl RelayState {
    pub fn new(model_api_url: Option<String>, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            model_api_url,
        })
    }
}

pub fn router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze-bin", post(analyze_bin_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// 指定ポートで待ち受け、Ctrl+Cで終了
pub async fn serve(port: u16, state: RelayState) -> Result<()> {
    if state.model_api_url.is_none() {
        warn!("MODEL_API_URL is not configured; /analyze-bin will return 500");
    }

    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address).await?;
    info!("Relay running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
