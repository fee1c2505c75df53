//! Error types

mod api;
mod auth;
mod cache;
mod validation;

pub use api::*;
pub use auth::*;
pub use cache::*;
pub use validation::*;

/// Top-level error returned by the archive client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No usable access token.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request was rejected before it was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A cached value could not be encoded or decoded.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl Error {
    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status_code(),
            _ => None,
        }
    }

    /// Returns `true` if the same request might succeed later.
    ///
    /// Informational only; bulk mutations are never retried automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            _ => false,
        }
    }
}
