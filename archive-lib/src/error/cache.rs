//! Cache error types

/// Errors raised while encoding or decoding cached query results.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Value could not be encoded.
    #[error("Failed to encode cached value: {0}")]
    Serialization(bincode::Error),

    /// Stored bytes could not be decoded.
    #[error("Failed to decode cached value for {key}: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: bincode::Error,
    },
}
