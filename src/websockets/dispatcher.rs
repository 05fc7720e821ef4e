use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::connection_manager::ConnectionManager;
use super::messages::{ClientEvent, WebSocketMessage};
use super::socket::MessageHandler;
use crate::room::RoomService;
use crate::shared::AppError;
use crate::user::UserMappingService;

/// Routes inbound client events to the room service and fans the results out
/// to the affected connections.
///
/// Handling is serialised behind `sequencer`: one event, including its
/// broadcasts, completes before the next one starts. Members of a room
/// therefore see `room-updated` frames in commit order.
pub struct EventDispatcher {
    room_service: Arc<RoomService>,
    user_mapping: Arc<dyn UserMappingService>,
    connection_manager: Arc<dyn ConnectionManager>,
    sequencer: Mutex<()>,
}

impl EventDispatcher {
    pub fn new(
        room_service: Arc<RoomService>,
        user_mapping: Arc<dyn UserMappingService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            room_service,
            user_mapping,
            connection_manager,
            sequencer: Mutex::new(()),
        }
    }

    /// Handles one decoded event. Failures are reported to the sender only.
    #[instrument(skip(self, event))]
    pub async fn dispatch(&self, connection_id: &str, event: ClientEvent) {
        let _turn = self.sequencer.lock().await;

        if let Err(e) = self.handle_event(connection_id, event).await {
            debug!(connection_id = %connection_id, error = %e, "Event rejected");
            self.send_error(connection_id, &e.to_string()).await;
        }
    }

    /// Drops the identity bound to a closed connection. Room membership and
    /// hosting are left untouched.
    pub async fn handle_disconnect(&self, connection_id: &str) {
        let _turn = self.sequencer.lock().await;

        if let Some(user) = self.user_mapping.remove_user(connection_id).await {
            info!(connection_id = %connection_id, name = %user.name, "User disconnected");
        }
    }

    async fn handle_event(&self, connection_id: &str, event: ClientEvent) -> Result<(), AppError> {
        match event {
            ClientEvent::Login { name } => {
                let user = self.user_mapping.login(connection_id, &name).await?;
                let message = encode(WebSocketMessage::login_success(&user))?;
                self.connection_manager
                    .send_to_player(connection_id, &message)
                    .await;
            }

            ClientEvent::CreateRoom { game_id } => {
                let user = self.require_user(connection_id).await?;
                let room = self.room_service.create_room(user, &game_id).await?;
                let message = encode(WebSocketMessage::room_created(&room))?;
                self.connection_manager
                    .send_to_player(connection_id, &message)
                    .await;
            }

            ClientEvent::JoinRoom { room_id } => {
                let user = self.require_user(connection_id).await?;
                let room = self.room_service.join_room(user, &room_id).await?;

                let updated = encode(WebSocketMessage::room_updated(&room))?;
                let joined = encode(WebSocketMessage::room_joined(&room))?;
                self.connection_manager
                    .send_to_players(&room.player_ids(), &updated)
                    .await;
                self.connection_manager
                    .send_to_player(connection_id, &joined)
                    .await;
            }

            ClientEvent::StartGame { room_id } => {
                let user = self.require_user(connection_id).await?;
                let room = self.room_service.start_game(&user.id, &room_id).await?;

                let updated = encode(WebSocketMessage::room_updated(&room))?;
                self.connection_manager
                    .send_to_players(&room.player_ids(), &updated)
                    .await;
            }

            ClientEvent::MakeMove { room_id, mv } => {
                let Some(user) = self.user_mapping.get_user(connection_id).await else {
                    debug!(connection_id = %connection_id, "Move from unknown user ignored");
                    return Ok(());
                };

                let applied = match self.room_service.make_move(&user.id, &room_id, &mv).await {
                    Err(AppError::RoomNotFound) => {
                        debug!(room_id = %room_id, "Move for unknown room ignored");
                        return Ok(());
                    }
                    other => other?,
                };

                let recipients = applied.room.player_ids();
                if let Some(result) = &applied.game_over {
                    let over = encode(WebSocketMessage::game_over(result))?;
                    self.connection_manager
                        .send_to_players(&recipients, &over)
                        .await;
                }
                let updated = encode(WebSocketMessage::room_updated(&applied.room))?;
                self.connection_manager
                    .send_to_players(&recipients, &updated)
                    .await;
            }
        }

        Ok(())
    }

    async fn require_user(&self, connection_id: &str) -> Result<crate::user::User, AppError> {
        self.user_mapping
            .get_user(connection_id)
            .await
            .ok_or(AppError::AuthRequired)
    }

    async fn send_error(&self, connection_id: &str, message: &str) {
        match serde_json::to_string(&WebSocketMessage::error(message)) {
            Ok(json) => {
                self.connection_manager
                    .send_to_player(connection_id, &json)
                    .await
            }
            Err(e) => warn!(error = %e, "Failed to serialize error message"),
        }
    }
}

fn encode(message: Result<WebSocketMessage, serde_json::Error>) -> Result<String, AppError> {
    message
        .and_then(|message| serde_json::to_string(&message))
        .map_err(|e| {
            warn!(error = %e, "Failed to serialize message");
            AppError::Internal
        })
}

#[async_trait]
impl MessageHandler for EventDispatcher {
    async fn handle_message(&self, connection_id: &str, message: String) {
        debug!(connection_id = %connection_id, message = %message, "Received message");

        let event = serde_json::from_str::<WebSocketMessage>(&message)
            .map_err(|e| {
                warn!(connection_id = %connection_id, error = %e, "Failed to parse WebSocket message");
                AppError::InvalidPayload("Invalid message format".to_string())
            })
            .and_then(ClientEvent::from_message);

        match event {
            Ok(event) => self.dispatch(connection_id, event).await,
            Err(e) => self.send_error(connection_id, &e.to_string()).await,
        }
    }

    async fn handle_disconnect(&self, connection_id: &str) {
        EventDispatcher::handle_disconnect(self, connection_id).await;
    }
}
