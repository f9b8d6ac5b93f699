//! Anonymous palette session identity.
//!
//! The client generates a token once and sends it with every palette call.
//! Nothing in the server reads it from ambient state; it is passed explicitly
//! to each palette operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest token accepted from a client.
const MAX_TOKEN_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionTokenError {
    #[error("session token is empty")]
    Empty,
    #[error("session token longer than {MAX_TOKEN_LEN} characters")]
    TooLong,
    #[error("session token contains characters outside [A-Za-z0-9_-]")]
    InvalidCharacters,
}

impl SessionToken {
    /// Validate a client-supplied token.
    pub fn parse(raw: &str) -> Result<Self, SessionTokenError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SessionTokenError::Empty);
        }
        if raw.len() > MAX_TOKEN_LEN {
            return Err(SessionTokenError::TooLong);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SessionTokenError::InvalidCharacters);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
