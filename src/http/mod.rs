//! HTTP plumbing shared by the upstream adapters.
//!
//! Every adapter that talks to a remote service (the Blockscout transfer
//! source and both exchange-rate sources) owns one [`HttpClient`]. The client
//! wraps a `reqwest` client in `reqwest-middleware` so transient failures are
//! retried with exponential backoff before an error ever reaches the caller.
//!
//! # Error Handling
//!
//! All requests return [`HttpError`]:
//!
//! - Network failures (connection refused, timeouts, exhausted retries)
//! - Server errors (non-2xx responses, with the body kept for diagnostics)
//! - Serialization errors (malformed JSON)
//! - URL parsing errors
//!
//! Adapters wrap these in their own error types, so the feed and the
//! conversion service never see transport details directly.

mod error;
mod http_client;

pub use error::HttpError;
pub use http_client::HttpClient;
