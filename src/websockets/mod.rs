// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use dispatcher::EventDispatcher;
pub use handler::websocket_handler;
pub use messages::{ClientEvent, MessageType, WebSocketMessage};
pub use socket::{MessageHandler, SocketError, SocketWrapper};

// Internal modules
mod connection_manager;
mod dispatcher;
mod handler;
mod messages;
mod socket;
