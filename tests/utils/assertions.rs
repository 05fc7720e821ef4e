//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;

use gamelobby::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    players: Vec<&'a str>, // names
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for all players in the setup
    pub fn for_all_players(setup: &'a TestSetup) -> Self {
        let players = setup.players.iter().map(|(name, _)| name.as_str()).collect();
        Self { setup, players }
    }

    /// Create an assertion for specific players
    pub fn for_players(setup: &'a TestSetup, players: Vec<&'a str>) -> Self {
        Self { setup, players }
    }

    pub fn for_player(setup: &'a TestSetup, player: &'a str) -> Self {
        Self::for_players(setup, vec![player])
    }

    /// Assert that every player's next frame has the given type and that all
    /// of them carry the same payload (consumes the frame)
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for player in &self.players {
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(self.setup.conn(player))
                .await;
            assert!(
                message.is_some(),
                "{} should have received a {} message",
                player,
                expected_type
            );

            let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type (payload: {})",
                player, msg.payload
            );
            messages.push(msg);
        }

        let first_payload = &messages[0].payload;
        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                &msg.payload, first_payload,
                "Player {} payload differs from player {}",
                self.players[i], self.players[0]
            );
        }

        MessageContent {
            payload: first_payload.clone(),
        }
    }

    /// Assert that every player's next frame is an error with this message
    pub async fn received_error(self, expected: &str) {
        let content = self.received_message_type(MessageType::Error).await;
        assert_eq!(content.payload, Value::String(expected.to_string()));
    }

    /// Assert that players have no pending messages
    pub async fn received_no_messages(self) {
        for player in &self.players {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(self.setup.conn(player))
                .await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                player,
                messages
            );
        }
    }

    /// Assert the pending frame types for each player, in order (non-consuming)
    pub async fn received_message_sequence(self, expected_types: Vec<MessageType>) {
        for player in &self.players {
            let types: Vec<MessageType> = self
                .setup
                .mock_conn_manager
                .get_messages_for(self.setup.conn(player))
                .await
                .iter()
                .map(|frame| {
                    serde_json::from_str::<WebSocketMessage>(frame)
                        .unwrap()
                        .message_type
                })
                .collect();
            assert_eq!(types, expected_types, "{} received wrong sequence", player);
        }
    }
}

/// Payload of a received frame with room-shaped accessors
pub struct MessageContent {
    pub payload: Value,
}

impl MessageContent {
    pub fn status(&self) -> &str {
        self.payload["status"].as_str().unwrap_or_default()
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.payload["players"]
            .as_array()
            .map(|players| {
                players
                    .iter()
                    .filter_map(|p| p["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn game_state(&self) -> &Value {
        &self.payload["gameState"]
    }

    pub fn verify_status(self, expected: &str) -> Self {
        assert_eq!(self.status(), expected, "unexpected room status");
        self
    }

    pub fn verify_player_count(self, expected: usize) -> Self {
        assert_eq!(self.player_ids().len(), expected, "unexpected player count");
        self
    }
}
