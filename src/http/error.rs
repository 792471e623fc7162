//! Error types for HTTP client operations.

use thiserror::Error;

/// Errors that can occur while talking to an upstream service.
///
/// # Error Categories
///
/// - **Network errors**: [`RequestFailed`](HttpError::RequestFailed),
///   [`MiddlewareError`](HttpError::MiddlewareError)
/// - **Server errors**: [`ServerError`](HttpError::ServerError)
/// - **Client errors**: [`UrlError`](HttpError::UrlError),
///   [`UnsupportedMethod`](HttpError::UnsupportedMethod),
///   [`JsonError`](HttpError::JsonError)
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request failed due to a network or connection error, or the
    /// response body could not be decoded.
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The retry middleware gave up. All attempts have been exhausted.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),

    /// The server returned a non-success HTTP status code.
    #[error("Server error {status}: {body}")]
    ServerError {
        /// The HTTP status code returned by the server.
        status: reqwest::StatusCode,
        /// The response body, which may contain error details.
        body: String,
    },

    /// Joining the base URL with a request path produced an invalid URL.
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// Only `GET` and `POST` are supported.
    #[error("Unsupported HTTP method")]
    UnsupportedMethod,

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
