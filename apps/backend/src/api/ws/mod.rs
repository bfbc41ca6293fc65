mod client;
mod server;
mod state;

use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    response::Response,
    routing::get,
    Router,
};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::time::Duration;

use crate::models::api::ServerMessage;
use crate::realtime::Delivery;
use crate::AppState;
use client::handle_client_messages;
use server::handle_server_messages;
use state::SocketState;

// Configuration constants
const PING_INTERVAL: Duration = Duration::from_secs(30);
const PONG_TIMEOUT: Duration = Duration::from_secs(60);

/// Create WebSocket routes
pub fn create_ws() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection: register an observer, push the current
/// snapshot, then forward every later snapshot until either side goes away
async fn handle_socket(socket: WebSocket, state: AppState) {
    let broadcaster = state.publisher.broadcaster().clone();
    let observer = broadcaster.connect().await;
    let observer_id = observer.id();

    // Registered first, so any mutation from here on reaches this observer too
    match state.publisher.publish_to(observer_id).await {
        Ok(Ok(Delivery::Delivered)) => {
            log::debug!("Sent initial snapshot to observer {}", observer_id);
        }
        Ok(Ok(Delivery::Stale)) => {
            log::debug!("Observer {} already has a newer snapshot", observer_id);
        }
        Ok(Err(e)) => log::warn!("Initial snapshot not delivered: {}", e),
        Err(e) => log::error!("Failed to read tasks for initial snapshot: {}", e),
    }

    let (sender, receiver) = socket.split();
    let socket_state = Arc::new(RwLock::new(SocketState::new()));
    let (reply_tx, reply_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Task 1: Handle incoming messages from client
    let mut recv_task = {
        let socket_state = socket_state.clone();
        tokio::spawn(async move { handle_client_messages(receiver, socket_state, reply_tx).await })
    };

    // Task 2: Send snapshots and replies to client + ping/pong management
    let mut send_task = {
        let socket_state = socket_state.clone();
        tokio::spawn(async move {
            handle_server_messages(sender, observer, socket_state, reply_rx).await
        })
    };

    // Wait for either task to complete (disconnection)
    tokio::select! {
        _ = &mut recv_task => {
            log::debug!("WebSocket receive task ended");
            send_task.abort();
        },
        _ = &mut send_task => {
            log::debug!("WebSocket send task ended");
            recv_task.abort();
        },
    }

    broadcaster.disconnect(observer_id).await;
    log::info!("WebSocket connection closed for observer {}", observer_id);
}
