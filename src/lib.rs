pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

use {
    adapters::realtime::RealtimeHub,
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, post},
    },
    services::reconciliation::Reconciler,
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Reconciler,
    pub hub: RealtimeHub,
    pub midtrans_server_key: Option<Arc<str>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/webhook/midtrans",
            post(adapters::midtrans::webhook::midtrans_webhook_handler),
        )
        .route("/ws/{user_id}", get(adapters::realtime::ws_handler))
        .layer(DefaultBodyLimit::max(64 * 1024)) // gateway notifications are a few KB
        .with_state(state)
}
