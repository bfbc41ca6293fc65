//! WebSocket connection state management

use tokio::time::Instant;

/// Shared state for a WebSocket connection
pub(super) struct SocketState {
    pub(super) last_pong: Instant,
}

impl SocketState {
    pub(super) fn new() -> Self {
        Self {
            last_pong: Instant::now(),
        }
    }
}
