use crate::error::{BrokerError, OAuthError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity providers the broker can sign users in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Kakao,
    Naver,
    Google,
}

impl ProviderKind {
    pub const ALL: [Self; 3] = [Self::Kakao, Self::Naver, Self::Google];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Naver => "naver",
            Self::Google => "google",
        }
    }

    /// Parses a path segment; matching is case-insensitive.
    pub fn parse(name: &str) -> Result<Self, OAuthError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "kakao" => Ok(Self::Kakao),
            "naver" => Ok(Self::Naver),
            "google" => Ok(Self::Google),
            _ => Err(OAuthError::ProviderNotFound(name.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s)?)
    }
}
