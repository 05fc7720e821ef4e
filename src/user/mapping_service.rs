use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::User;
use crate::shared::AppError;

/// Service for managing connection id → user mappings
///
/// A connection becomes a user on `login` and stops being one on disconnect.
/// Room membership refers to users by id only and is never cleaned up here.
#[async_trait]
pub trait UserMappingService: Send + Sync {
    /// Bind a connection to a user with the given display name. Logging in
    /// again on the same connection renames the existing user.
    async fn login(&self, connection_id: &str, name: &str) -> Result<User, MappingError>;

    /// Get the user bound to a connection
    async fn get_user(&self, connection_id: &str) -> Option<User>;

    /// Remove the user bound to a connection (on disconnect)
    async fn remove_user(&self, connection_id: &str) -> Option<User>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid connection id: {connection_id}")]
    InvalidConnectionId { connection_id: String },
}

impl From<MappingError> for AppError {
    fn from(err: MappingError) -> Self {
        AppError::InvalidPayload(err.to_string())
    }
}

/// In-memory implementation of UserMappingService
/// Uses RwLock for concurrent access with read optimization
pub struct InMemoryUserMappingService {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserMappingService {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Generate a new id for an incoming connection
    pub fn generate_connection_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn validate_connection_id(connection_id: &str) -> Result<(), MappingError> {
        Uuid::parse_str(connection_id).map_err(|_| MappingError::InvalidConnectionId {
            connection_id: connection_id.to_string(),
        })?;
        Ok(())
    }
}

impl Default for InMemoryUserMappingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserMappingService for InMemoryUserMappingService {
    async fn login(&self, connection_id: &str, name: &str) -> Result<User, MappingError> {
        Self::validate_connection_id(connection_id)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(MappingError::EmptyName);
        }

        let user = User::new(connection_id, name);
        let previous = self
            .users
            .write()
            .await
            .insert(connection_id.to_string(), user.clone());

        match previous {
            Some(old) => info!(
                connection_id = %connection_id,
                old_name = %old.name,
                name = %user.name,
                "User renamed"
            ),
            None => info!(connection_id = %connection_id, name = %user.name, "User logged in"),
        }

        Ok(user)
    }

    async fn get_user(&self, connection_id: &str) -> Option<User> {
        let users = self.users.read().await;
        let result = users.get(connection_id).cloned();

        debug!(
            connection_id = %connection_id,
            user = ?result,
            "Connection to user lookup"
        );

        result
    }

    async fn remove_user(&self, connection_id: &str) -> Option<User> {
        let removed = self.users.write().await.remove(connection_id);

        match &removed {
            Some(user) => info!(connection_id = %connection_id, name = %user.name, "Removed user"),
            None => debug!(connection_id = %connection_id, "Disconnect from connection without login"),
        }

        removed
    }
}
