// Identity: display-name registration and JWT validation

// Public API - what other modules can use
pub use handlers::create_session;
pub use types::SessionClaims;

// Internal modules
mod handlers;
pub mod service;
pub mod token;
pub mod types;
