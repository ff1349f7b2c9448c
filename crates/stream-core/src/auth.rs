//! Opaque bearer credentials.
//!
//! Tokens are issued outside of this crate (usually a JWT signed with the API
//! secret). Clients only ever forward them in the `Authorization` header.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Bearer credential supplied with every request.
pub struct Token(SecretString);

impl Token {
    /// Wrap an already issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Token {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
