pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod password;
pub mod service;
pub mod session;

// Re-export commonly used types
pub use models::{Profile, PublicUser, Registration, Role, Session, User};
pub use service::IdentityService;
pub use session::SessionStore;
