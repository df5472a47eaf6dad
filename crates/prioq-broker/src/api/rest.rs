use crate::{BrokerMetrics, QueueRegistry};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prioq_core::{Priority, Task};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<QueueRegistry>,
    pub metrics: Arc<BrokerMetrics>,
}

/// REST API routes
pub fn create_rest_api(registry: Arc<QueueRegistry>, metrics: Arc<BrokerMetrics>) -> Router {
    Router::new()
        .route("/push", post(push_task))
        .route("/pop", post(pop_task))
        .route("/stats", get(get_stats))
        .route("/health", get(health_check))
        .route("/metrics", get(scrape_metrics))
        .with_state(AppState { registry, metrics })
}

#[derive(Debug, Deserialize)]
struct QueueParam {
    queue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushTaskRequest {
    body: String,
    priority: Option<String>,
}

#[derive(Debug, Serialize)]
struct PushTaskResponse {
    queue: String,
    priority: &'static str,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    queue_count: usize,
    pending_total: usize,
    queues: Vec<QueueStats>,
}

#[derive(Debug, Serialize)]
struct QueueStats {
    name: String,
    depth: TierDepth,
}

#[derive(Debug, Serialize)]
struct TierDepth {
    high: usize,
    medium: usize,
    low: usize,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    queue_count: usize,
    pending_tasks: usize,
}

/// Push a task onto a named queue. The queue name arrives as a query
/// parameter; any name is accepted, including the empty string.
async fn push_task(
    State(state): State<AppState>,
    Query(params): Query<QueueParam>,
    Json(req): Json<PushTaskRequest>,
) -> Result<Json<PushTaskResponse>, ApiError> {
    let queue_name = params.queue.ok_or(ApiError::MissingQueueName)?;

    // Unrecognized or absent priority normalizes to low; the queue
    // itself normalizes again, so nothing here can reject a task.
    let priority = Priority::parse(req.priority.as_deref());
    let task = Task::new(req.body, priority);

    state.registry.resolve(&queue_name).push(task);
    state.metrics.inc_pushed(priority);

    tracing::debug!(queue = %queue_name, priority = priority.as_str(), "task pushed");

    Ok(Json(PushTaskResponse {
        queue: queue_name,
        priority: priority.as_str(),
    }))
}

/// Pop the highest-priority pending task from a named queue.
async fn pop_task(
    State(state): State<AppState>,
    Query(params): Query<QueueParam>,
) -> Result<Json<Task>, ApiError> {
    let queue_name = params.queue.ok_or(ApiError::MissingQueueName)?;

    match state.registry.resolve(&queue_name).pop() {
        Some(task) => {
            state.metrics.inc_popped(task.priority);
            tracing::debug!(queue = %queue_name, priority = task.priority.as_str(), "task popped");
            Ok(Json(task))
        }
        None => {
            state.metrics.pops_empty_total.inc();
            Err(ApiError::NoTaskAvailable { queue: queue_name })
        }
    }
}

/// Per-queue depth snapshot.
async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let queues: Vec<QueueStats> = state
        .registry
        .depths()
        .into_iter()
        .map(|(name, (high, medium, low))| QueueStats {
            name,
            depth: TierDepth { high, medium, low },
        })
        .collect();

    Json(StatsResponse {
        queue_count: queues.len(),
        pending_total: queues
            .iter()
            .map(|q| q.depth.high + q.depth.medium + q.depth.low)
            .sum(),
        queues,
    })
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        queue_count: state.registry.queue_count(),
        pending_tasks: state.registry.pending_total(),
    })
}

/// Prometheus text exposition.
async fn scrape_metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state.metrics.refresh_gauges(&state.registry);

    let encoder = TextEncoder::new();
    let families = state.metrics.registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&families, &mut buffer)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| ApiError::Internal(e.to_string()))
}

/// API error types. An empty queue on pop is a distinct outcome from
/// a malformed request: the former is 404, the latter 400.
#[derive(Debug, Error)]
enum ApiError {
    #[error("queue query param required")]
    MissingQueueName,

    #[error("no tasks available in queue '{queue}'")]
    NoTaskAvailable { queue: String },

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingQueueName => StatusCode::BAD_REQUEST,
            ApiError::NoTaskAvailable { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
