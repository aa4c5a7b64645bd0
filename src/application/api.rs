//! HTTP read API over the published pair snapshot

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use super::scheduler::{SchedulerHandle, SchedulerState};
use crate::domain::pool::PairStore;
use crate::shared::errors::AppError;
use crate::shared::types::PairSnapshot;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<PairStore>,
    pub scheduler: Arc<SchedulerHandle>,
}

/// Serializes the pair map of a shared snapshot without copying it
pub struct PairsBody(Arc<PairSnapshot>);

impl Serialize for PairsBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.pairs.serialize(serializer)
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: SchedulerState,
    pub pairs: usize,
    pub snapshot_cycle: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub last_error: Option<String>,
    pub version: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/liquidity", get(liquidity))
        .route("/api/v1/status", get(status))
        .route("/api/v1/refresh", post(refresh))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /api/v1/liquidity
async fn liquidity(State(state): State<ApiState>) -> Json<PairsBody> {
    debug!("Called: /api/v1/liquidity");
    Json(PairsBody(state.store.snapshot().await))
}

/// GET /api/v1/status
async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let snapshot = state.store.snapshot().await;
    let scheduler = state.scheduler.status();

    Json(StatusResponse {
        state: scheduler.state,
        pairs: snapshot.len(),
        snapshot_cycle: snapshot.cycle,
        published_at: snapshot.published_at,
        cycles_completed: scheduler.cycles_completed,
        cycles_failed: scheduler.cycles_failed,
        last_error: scheduler.last_error,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/v1/refresh
async fn refresh(State(state): State<ApiState>) -> impl IntoResponse {
    info!("🔁 Refresh requested over HTTP");
    state.scheduler.restart();
    (StatusCode::ACCEPTED, Json(serde_json::json!({ "accepted": true })))
}

/// Serve the API until `shutdown` resolves.
pub async fn serve<F>(bind: SocketAddr, state: ApiState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| AppError::ServerError(format!("Failed to bind to {}: {}", bind, e)))?;
    info!("🌐 Liquidity API listening on http://{}/api/v1/liquidity", bind);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::ServerError(e.to_string()))
}
