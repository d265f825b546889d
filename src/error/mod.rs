//! The unified error handling system for the broker.

pub use auth::OAuthError;
pub use types::BrokerError;

/// A unified `Result` type for the entire application.
pub type Result<T> = std::result::Result<T, BrokerError>;

/// Result type for the OAuth provider clients.
pub type OAuthResult<T> = std::result::Result<T, OAuthError>;

pub mod auth;
pub mod macros;
pub mod types;

/// Error category for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Errors caused by the client (bad input, unknown provider).
    /// Corresponds to 4xx HTTP status codes.
    Client,
    /// Errors caused by the server or its dependencies.
    /// Corresponds to 5xx HTTP status codes.
    Server,
}
