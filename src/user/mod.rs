pub mod mapping_service;
pub mod models;

pub use mapping_service::{InMemoryUserMappingService, MappingError, UserMappingService};
pub use models::User;
