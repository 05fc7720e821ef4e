use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::socket::{Connection, MessageHandler};
use crate::shared::AppState;
use crate::user::InMemoryUserMappingService;

/// WebSocket endpoint. Every upgrade gets a fresh connection id; the client
/// becomes a user by sending `login` over the socket.
///
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: WebSocket, app_state: AppState) {
    let connection_id = InMemoryUserMappingService::generate_connection_id();
    info!(connection_id = %connection_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let message_handler: Arc<dyn MessageHandler> = app_state.dispatcher.clone();
    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler.clone(),
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => info!(connection_id = %connection_id, "WebSocket connection closed cleanly"),
        Err(e) => warn!(connection_id = %connection_id, error = ?e, "WebSocket connection error"),
    }

    // Cleanup: stop routing frames here, then forget the identity
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;
    message_handler.handle_disconnect(&connection_id).await;
}
