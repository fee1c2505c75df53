//! Bearer tokens and where the client gets them

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::AuthError;

/// A bearer token, optionally with a known expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// A token with no known expiry.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_at: None,
        }
    }

    /// A token that stops working at `expires_at`.
    pub fn with_expiry(secret: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            secret: secret.into(),
            expires_at: Some(expires_at),
        }
    }

    /// The value sent in the `Authorization: Bearer` header.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Tokens without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    fn check(&self) -> Result<AccessToken, AuthError> {
        if self.is_expired() {
            return Err(AuthError::TokenExpired {
                message: format!("token expired at {:?}", self.expires_at),
            });
        }
        Ok(self.clone())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Supplies the token for each request.
///
/// Sessions live outside this crate; a provider hands over whatever token
/// the current session holds.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self, base_url: &str) -> Result<AccessToken, AuthError>;
}

/// Always returns the same token, until it expires.
///
/// ```
/// use archive_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("my-access-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self::from_token(AccessToken::new(secret))
    }

    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _base_url: &str) -> Result<AccessToken, AuthError> {
        self.token.check()
    }
}

/// A token the session owner can replace or revoke while clients use it.
#[derive(Debug, Default)]
pub struct SessionTokenProvider {
    token: RwLock<Option<AccessToken>>,
}

impl SessionTokenProvider {
    /// A provider with no session yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the token of a new or refreshed session.
    pub fn sign_in(&self, token: AccessToken) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    /// Forgets the session. Later requests fail with [`AuthError::NotSignedIn`].
    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

#[async_trait]
impl TokenProvider for SessionTokenProvider {
    async fn get_token(&self, _base_url: &str) -> Result<AccessToken, AuthError> {
        let token = self.token.read().ok().and_then(|guard| (*guard).clone());
        token.ok_or(AuthError::NotSignedIn)?.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTokenProvider::new("abc");
        let token = provider.get_token("http://localhost").await.unwrap();
        assert_eq!(token.secret(), "abc");

        let past = Utc::now() - chrono::Duration::minutes(5);
        let expired = StaticTokenProvider::from_token(AccessToken::with_expiry("abc", past));
        assert!(matches!(
            expired.get_token("http://localhost").await,
            Err(AuthError::TokenExpired { .. })
        ));
    }

    #[tokio::test]
    async fn test_session_provider_follows_sign_in_and_out() {
        let provider = SessionTokenProvider::new();
        assert!(matches!(
            provider.get_token("http://localhost").await,
            Err(AuthError::NotSignedIn)
        ));

        provider.sign_in(AccessToken::new("first"));
        provider.sign_in(AccessToken::new("second"));
        let token = provider.get_token("http://localhost").await.unwrap();
        assert_eq!(token.secret(), "second");

        provider.sign_out();
        assert!(provider.get_token("http://localhost").await.is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", AccessToken::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
