//! WebSocket client message handling - processes messages from clients

use axum::extract::ws::{Message, WebSocket};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::time::Instant;

use crate::models::api::{ClientMessage, ServerMessage};

use super::SocketState;

/// Handle incoming messages from the client
pub(super) async fn handle_client_messages(
    mut receiver: futures::stream::SplitStream<WebSocket>,
    socket_state: Arc<RwLock<SocketState>>,
    reply_tx: mpsc::UnboundedSender<ServerMessage>,
) {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Ping) => {
                    log::debug!("Received application ping");
                    let _ = reply_tx.send(ServerMessage::Pong);
                }
                Err(e) => {
                    log::debug!("Ignoring unrecognised client message: {}", e);
                }
            },
            Ok(Message::Pong(_)) => {
                socket_state.write().await.last_pong = Instant::now();
                log::debug!("Received pong from client");
            }
            Ok(Message::Close(frame)) => {
                log::info!("Client sent close frame: {:?}", frame);
                break;
            }
            Err(e) => {
                log::error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }
}
