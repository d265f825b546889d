//! Session token management
//!
//! Mints and verifies the HS256 session token handed to the front end after a
//! successful provider login.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};

use crate::auth::types::{NormalizedIdentity, SESSION_ISSUER, SessionClaims};
use crate::config::{JwtConfig, MIN_JWT_SECRET_LEN};
use crate::error::{BrokerError, Result};

/// Session token manager
pub struct SessionTokenManager {
    /// Encoding key
    encoding_key: EncodingKey,
    /// Decoding key
    decoding_key: DecodingKey,
    /// Validation configuration
    validation: Validation,
    /// Token lifetime in seconds
    ttl_seconds: i64,
}

impl std::fmt::Debug for SessionTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenManager")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl SessionTokenManager {
    /// Create a manager from the `[jwt]` section
    pub fn new(config: &JwtConfig) -> Result<Self> {
        crate::ensure_config!(
            config.secret.len() >= MIN_JWT_SECRET_LEN,
            "JWT 密钥长度不足: 需要至少 {} 字节",
            MIN_JWT_SECRET_LEN
        );
        crate::ensure_config!(config.expires_in > 0, "JWT 有效期必须大于0");

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 30; // 30 seconds tolerance

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            ttl_seconds: config.expires_in,
        })
    }

    /// Mint a session token issued now
    pub fn mint(&self, identity: &NormalizedIdentity) -> Result<String> {
        self.mint_at(identity, Utc::now())
    }

    /// Mint a session token with an explicit issue time
    pub fn mint_at(&self, identity: &NormalizedIdentity, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims::new(identity, issued_at, self.ttl_seconds);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| BrokerError::internal_with_source("Token generation failed", e))
    }

    /// Validate and parse token
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let token_data: TokenData<SessionClaims> =
            decode(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    crate::auth_error!("认证令牌已过期")
                }
                _ => BrokerError::auth_with_source("Token validation failed", e),
            })?;

        Ok(token_data.claims)
    }

    /// Token lifetime in seconds
    #[must_use]
    pub const fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}
