use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod realtime;
pub mod service;

use db::TaskStore;
use realtime::{Broadcaster, SnapshotPublisher};
use service::TaskService;

/// Shared state handed to every REST and WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub service: TaskService,
    pub publisher: Arc<SnapshotPublisher>,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        let broadcaster = Arc::new(Broadcaster::new());
        let publisher = Arc::new(SnapshotPublisher::new(store.clone(), broadcaster));
        let service = TaskService::new(store, publisher.clone());
        Self { service, publisher }
    }
}

/// Full application router: REST, WebSocket feed and API docs
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(api::rest::create_rest())
        .merge(api::ws::create_ws())
        .with_state(state)
        .layer(CorsLayer::permissive())
}
