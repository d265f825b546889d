//! Errors raised while driving a third-party OAuth 2.0 login.

use thiserror::Error;

/// Errors related to the OAuth 2.0 authorization-code flow.
///
/// Exchange and profile failures carry the underlying cause as text for local
/// logging only; the browser never sees it.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    #[error("Login deadline of {0}s exceeded")]
    DeadlineExceeded(u64),
}

