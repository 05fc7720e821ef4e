use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Outbound side of every live websocket, keyed by connection id
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, connection_id: &str);

    async fn send_to_player(&self, connection_id: &str, message: &str);

    /// Fire-and-forget fan-out; unknown or closed connections are skipped
    async fn send_to_players(&self, connection_ids: &[String], message: &str);
}

pub struct InMemoryConnectionManager {
    // connection id -> sender
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn deliver(
        connections: &HashMap<String, mpsc::UnboundedSender<String>>,
        connection_id: &str,
        message: &str,
    ) {
        match connections.get(connection_id) {
            Some(sender) => {
                if sender.send(message.to_string()).is_err() {
                    debug!(connection_id = %connection_id, "Outbound channel closed, message dropped");
                }
            }
            None => debug!(connection_id = %connection_id, "No live connection, message dropped"),
        }
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(connection_id);
    }

    async fn send_to_player(&self, connection_id: &str, message: &str) {
        let connections = self.connections.read().await;
        Self::deliver(&connections, connection_id, message);
    }

    async fn send_to_players(&self, connection_ids: &[String], message: &str) {
        let connections = self.connections.read().await;
        for connection_id in connection_ids {
            Self::deliver(&connections, connection_id, message);
        }
    }
}
