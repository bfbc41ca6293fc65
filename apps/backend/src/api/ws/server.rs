//! WebSocket server message handling - sends messages to clients

use axum::{
    body::Bytes,
    extract::ws::{Message, WebSocket},
};
use futures::SinkExt;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;

use crate::models::api::ServerMessage;
use crate::realtime::Observer;

use super::{SocketState, PING_INTERVAL, PONG_TIMEOUT};

/// Handle outgoing messages to the client and ping/pong management
pub(super) async fn handle_server_messages(
    mut sender: futures::stream::SplitSink<WebSocket, Message>,
    mut observer: Observer,
    socket_state: Arc<RwLock<SocketState>>,
    mut reply_rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    let mut ping_interval = interval(PING_INTERVAL);

    loop {
        tokio::select! {
            // Send ping and check for a dead connection
            _ = ping_interval.tick() => {
                let last_pong = socket_state.read().await.last_pong;
                if last_pong.elapsed() > PONG_TIMEOUT {
                    log::warn!("No pong received for {:?}, disconnecting observer {}", last_pong.elapsed(), observer.id());
                    break;
                }

                if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    log::error!("Failed to send ping, client disconnected");
                    break;
                }
                log::debug!("Sent ping to client");
            }

            // Replies to client messages
            Some(reply) = reply_rx.recv() => {
                if !send_json(&mut sender, &reply).await {
                    break;
                }
            }

            // Forward snapshots to client
            snapshot = observer.next_snapshot() => {
                let Some(snapshot) = snapshot else {
                    log::debug!("Observer {} removed from registry", observer.id());
                    break;
                };
                let msg = ServerMessage::from(&*snapshot);
                if !send_json(&mut sender, &msg).await {
                    break;
                }
                log::debug!("Sent snapshot {} to observer {}", snapshot.sequence, observer.id());
            }
        }
    }
}

/// Serialize and send one message. Returns false once the socket is unusable.
async fn send_json(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize message: {}", e);
            return true;
        }
    };

    if sender.send(Message::Text(json.into())).await.is_err() {
        log::error!("Failed to send message to client");
        return false;
    }
    true
}
