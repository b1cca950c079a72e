//! API client core for the document-scanning service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for every
//! backend operation (OCR, scanning, ID cards, PDF export, documents,
//! history, batch tools, image composition, watermark/translate and office
//! export). `ScanApi` runs each operation over a pluggable `Transport`;
//! `routes` holds the client-side route table.
//!
//! # Design
//! - `ScanClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `user_id` is always `"default"`; there is no session at this layer.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod routes;
pub mod transport;
pub mod types;

pub use api::ScanApi;
pub use client::ScanClient;
pub use config::ClientConfig;
pub use error::{ApiError, RouteError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use routes::{resolve, Route, RouteMatch, Router, View, ViewLoader, ROUTES};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::{
    Document, DocumentDetail, IdCardOptions, IdCardResult, IdInfo, OcrResult, PdfExport,
    ProcessOptions, ProcessResult, ScanHistoryItem, ScanOptions, ScanResult, Upload,
};
