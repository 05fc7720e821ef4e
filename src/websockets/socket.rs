use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Text-frame transport under a lobby connection
#[async_trait]
pub trait SocketWrapper: Send {
    async fn send_text(&mut self, frame: String) -> Result<(), SocketError>;

    /// Next text frame, or `None` once the peer has gone away
    async fn next_text(&mut self) -> Result<Option<String>, SocketError>;

    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Consumer of inbound frames for every connection
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle_message(&self, connection_id: &str, message: String);

    /// Called once after the connection has gone away
    async fn handle_disconnect(&self, connection_id: &str);
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_text(&mut self, frame: String) -> Result<(), SocketError> {
        self.send(Message::Text(frame))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn next_text(&mut self) -> Result<Option<String>, SocketError> {
        while let Some(frame) = self.next().await {
            match frame.map_err(|e| SocketError::ReceiveFailed(e.to_string()))? {
                Message::Text(text) => return Ok(Some(text)),
                Message::Close(_) => return Ok(None),
                // binary, ping and pong
                _ => continue,
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// One live client: pumps queued outbound frames to the socket and hands
/// inbound frames to the shared handler until either side closes.
pub struct Connection {
    pub connection_id: String,
    socket: Box<dyn SocketWrapper>,
    outbound: mpsc::UnboundedReceiver<String>,
    handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        connection_id: String,
        socket: Box<dyn SocketWrapper>,
        outbound: mpsc::UnboundedReceiver<String>,
        handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            connection_id,
            socket,
            outbound,
            handler,
        }
    }

    pub async fn run(mut self) -> Result<(), SocketError> {
        let result = self.pump().await;

        if let Err(e) = self.socket.close().await {
            debug!(connection_id = %self.connection_id, error = %e, "Close frame not delivered");
        }
        result
    }

    async fn pump(&mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                // Drain pending broadcasts before reading the next client frame
                biased;

                queued = self.outbound.recv() => match queued {
                    Some(frame) => self.socket.send_text(frame).await?,
                    None => return Ok(()),
                },

                inbound = self.socket.next_text() => match inbound? {
                    Some(frame) => {
                        self.handler
                            .handle_message(&self.connection_id, frame)
                            .await
                    }
                    None => return Ok(()),
                },
            }
        }
    }
}
