//! Authentication error types

/// Errors raised while obtaining an access token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session is available.
    #[error("Not signed in")]
    NotSignedIn,

    /// Access token expired and could not be renewed.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },

    /// The token source failed.
    #[error("Token provider failed: {0}")]
    Provider(String),
}
