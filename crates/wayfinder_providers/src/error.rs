use thiserror::Error;

/// Failures raised by external capabilities. Callers map these into the
/// user-facing taxonomy at the point of call; none propagate uncaught.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Capability cannot produce a result right now (permission denied,
    /// sensor unavailable, service down).
    #[error("Capability unavailable: {0}")]
    Unavailable(String),
}
