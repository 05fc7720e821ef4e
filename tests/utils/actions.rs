use serde_json::{json, Value};

use gamelobby::{MessageHandler, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

#[allow(dead_code)]
impl TestSetup {
    /// Send a WebSocket frame as the named player
    pub async fn send_message(&self, player: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(player, message_json).await;
    }

    /// Send raw text as the named player
    pub async fn send_raw(&self, player: &str, text: String) {
        self.dispatcher.handle_message(self.conn(player), text).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_login(&self, player: &str, name: &str) {
        self.send_message(player, WebSocketMessage::new(MessageType::Login, json!(name)))
            .await;
    }

    pub async fn send_create_room(&self, player: &str, game_id: &str) {
        self.send_message(
            player,
            WebSocketMessage::new(MessageType::CreateRoom, json!(game_id)),
        )
        .await;
    }

    pub async fn send_join_room(&self, player: &str, room_id: &str) {
        self.send_message(
            player,
            WebSocketMessage::new(MessageType::JoinRoom, json!(room_id)),
        )
        .await;
    }

    pub async fn send_start_game(&self, player: &str, room_id: &str) {
        self.send_message(
            player,
            WebSocketMessage::new(MessageType::StartGame, json!(room_id)),
        )
        .await;
    }

    pub async fn send_move(&self, player: &str, room_id: &str, mv: Value) {
        self.send_message(
            player,
            WebSocketMessage::new(
                MessageType::MakeMove,
                json!({ "roomId": room_id, "move": mv }),
            ),
        )
        .await;
    }

    /// Disconnect the named player the way the socket handler does
    pub async fn disconnect(&self, player: &str) {
        self.dispatcher.handle_disconnect(self.conn(player)).await;
    }

    /// Host creates a room, then every other player joins it in order.
    /// Returns the room id with all frames cleared.
    pub async fn room_with_everyone(&self, game_id: &str) -> String {
        let (host, _) = &self.players[0];
        let room_id = self.create_room_as(host, game_id).await;

        for (player, _) in self.players.iter().skip(1) {
            self.send_join_room(player, &room_id).await;
        }

        self.clear_messages().await;
        room_id
    }

    /// Creates a room and returns its id, consuming the room-created frame
    pub async fn create_room_as(&self, player: &str, game_id: &str) -> String {
        self.send_create_room(player, game_id).await;
        let frame = self
            .mock_conn_manager
            .consume_message_for(self.conn(player))
            .await
            .expect("room-created frame");
        let message: WebSocketMessage = serde_json::from_str(&frame).unwrap();
        assert_eq!(message.message_type, MessageType::RoomCreated);
        message.payload["id"].as_str().unwrap().to_string()
    }
}
