use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, Uri, header::AUTHORIZATION};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::response::{ApiError, reply_response};
use crate::auth::{PasswordHasher, parse_basic_auth};
use crate::dispatch::{self, Request as DispatchRequest};
use crate::resource::{Context, IdAllocator};
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: PasswordHasher,
    pub ids: IdAllocator,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, hasher: PasswordHasher) -> Self {
        Self {
            store,
            hasher,
            ids: IdAllocator::new(),
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

/// Hands every non-health request to the dispatcher. Store calls block, so
/// the work runs on the blocking pool.
async fn handle(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let credentials = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_basic_auth);

    let request = DispatchRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        credentials,
        body,
    };

    let reply = tokio::task::spawn_blocking(move || {
        let ctx = Context {
            store: state.store.as_ref(),
            ids: &state.ids,
            hasher: &state.hasher,
        };
        dispatch::dispatch(&ctx, &request)
    })
    .await
    .map_err(|e| {
        tracing::error!("Request task failed: {e}");
        ApiError::internal("Internal server error")
    })??;

    Ok(reply_response(reply))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(handle)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
