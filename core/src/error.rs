//! Error types for the scanning API client and the route table.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the document does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body. Transport failures keep the transport's own error
//! as the `source`, uninterpreted.

use thiserror::Error;

/// Errors returned by `ScanClient` parse methods and `ScanApi` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The server answered 2xx with a `{"success": false}` envelope.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from resolving or building client-side routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches {0}")]
    NoMatch(String),

    #[error("unknown route name {0}")]
    UnknownName(String),

    #[error("route parameter {0} is missing")]
    MissingParam(String),
}
