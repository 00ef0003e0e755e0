use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::{Json, Router, routing::get};
use std::future::Future;
use tokio::net::TcpListener;

use super::publisher::{HealthReport, SharedSnapshot};

/// Viewer page.
pub const ENDPOINT_INDEX: &str = "/";
/// The latest snapshot document.
pub const ENDPOINT_DATA: &str = "/data.json";
/// Publish counters and a summary of the latest snapshot.
pub const ENDPOINT_HEALTH: &str = "/health";

pub fn router(store: SharedSnapshot) -> Router {
    Router::new()
        .route(ENDPOINT_INDEX, get(handle_index))
        .route(ENDPOINT_DATA, get(handle_data))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .with_state(store)
}

/// Serves the snapshot until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, store: SharedSnapshot, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Listening at http://{}", listener.local_addr()?);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn handle_index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

async fn handle_data(State(store): State<SharedSnapshot>) -> impl IntoResponse {
    let snapshot = store.latest().await;

    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(snapshot.as_ref().clone()),
    )
}

async fn handle_health(State(store): State<SharedSnapshot>) -> Json<HealthReport> {
    Json(store.health().await)
}
