/// Errors from the link API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL cannot be used to build endpoint URLs.
    #[error("Invalid link API base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The addressed record does not exist (HTTP 404).
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The API is throttling us (HTTP 429).
    #[error("Rate limited by link API")]
    RateLimited,

    /// Any other non-2xx response.
    #[error("Link API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}
