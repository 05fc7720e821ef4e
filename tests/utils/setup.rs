use std::sync::Arc;
use tokio::sync::mpsc;

use gamelobby::{
    websockets::ConnectionManager, EventDispatcher, GameRegistry, InMemoryRoomRepository,
    InMemoryUserMappingService, RoomService,
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub dispatcher: Arc<EventDispatcher>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub room_service: Arc<RoomService>,
    /// (name, connection id) in login order
    pub players: Vec<(String, String)>,
}

impl TestSetup {
    /// Connection id of a named player
    pub fn conn(&self, name: &str) -> &str {
        self.players
            .iter()
            .find(|(player, _)| player == name)
            .map(|(_, connection_id)| connection_id.as_str())
            .unwrap_or_else(|| panic!("no player named {}", name))
    }
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    anonymous: Vec<String>,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            anonymous: vec![],
        }
    }

    /// Players that connect and log in under the given names
    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "carol"])
    }

    /// Connections that never send `login`; addressed by the given label
    pub fn with_anonymous(mut self, label: &str) -> Self {
        self.anonymous.push(label.to_string());
        self
    }

    pub async fn build(self) -> TestSetup {
        let registry = Arc::new(GameRegistry::new());
        let room_service = Arc::new(RoomService::new(
            Arc::new(InMemoryRoomRepository::new()),
            registry,
        ));
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let dispatcher = Arc::new(EventDispatcher::new(
            room_service.clone(),
            Arc::new(InMemoryUserMappingService::new()),
            mock_conn_manager.clone(),
        ));

        let mut setup = TestSetup {
            dispatcher,
            mock_conn_manager,
            room_service,
            players: vec![],
        };

        for name in self.players {
            let connection_id = connect(&setup).await;
            setup.players.push((name.clone(), connection_id));
            setup.send_login(&name, &name).await;
        }

        for label in self.anonymous {
            let connection_id = connect(&setup).await;
            setup.players.push((label, connection_id));
        }

        setup.clear_messages().await;
        setup
    }
}

async fn connect(setup: &TestSetup) -> String {
    let connection_id = InMemoryUserMappingService::generate_connection_id();
    let (sender, _receiver) = mpsc::unbounded_channel();
    setup
        .mock_conn_manager
        .add_connection(connection_id.clone(), sender)
        .await;
    connection_id
}
