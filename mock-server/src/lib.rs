//! In-process stand-in for the scanning backend.
//!
//! Serves the same HTTP surface under `/api/v1`, keeps documents and scan
//! history in memory, and "recognizes" text by reading the uploaded bytes
//! as UTF-8 lines. Most POST responses use the backend's
//! `{"success": true, "data": ...}` envelope; listings are bare JSON.

mod form;
mod handlers;
pub mod recognize;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/v1";
pub const DEFAULT_USER_ID: &str = "default";

/// History listings are capped like the backend's.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub text: String,
    pub texts: Vec<String>,
    pub positions: Vec<Vec<[f64; 2]>>,
    pub count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StoredDocument {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub created_at: String,
    pub status: String,
    pub metadata: Value,
    /// `None` when recognition was skipped.
    pub ocr: Option<OcrResult>,
    pub image_url: Option<String>,
}

impl StoredDocument {
    fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "type": self.kind,
            "created_at": self.created_at,
            "status": self.status,
        })
    }

    /// `textCount` and `image_url` are left out when there is nothing to report.
    fn detail(&self) -> Value {
        let mut detail = json!({
            "id": self.id,
            "name": self.name,
            "type": self.kind,
            "created_at": self.created_at,
            "status": self.status,
            "metadata": self.metadata,
            "text": "",
        });
        if let Some(ocr) = &self.ocr {
            detail["text"] = json!(ocr.text);
            detail["textCount"] = json!(ocr.count);
        }
        if let Some(image_url) = &self.image_url {
            detail["image_url"] = json!(image_url);
        }
        detail
    }

    pub fn text_count(&self) -> u32 {
        self.ocr.as_ref().map_or(0, |ocr| ocr.count)
    }
}

#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: String,
    pub operation: String,
    pub created_at: String,
    pub text_count: u32,
}

#[derive(Debug, Default)]
pub struct Store {
    pub documents: Vec<StoredDocument>,
    pub history: Vec<HistoryEntry>,
}

impl Store {
    /// Keep `document` and log `operation` in the owner's history.
    pub fn insert(&mut self, document: StoredDocument, operation: &str) {
        self.history.push(HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: document.user_id.clone(),
            operation: operation.to_string(),
            created_at: document.created_at.clone(),
            text_count: document.text_count(),
        });
        self.documents.push(document);
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error response in FastAPI's shape: `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiFailure {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn app() -> Router {
    app_with_store(Arc::new(RwLock::new(Store::default())))
}

pub fn app_with_store(db: Db) -> Router {
    let api = Router::new()
        .route("/ocr", post(handlers::ocr_image))
        .route("/scan", post(handlers::scan_document))
        .route("/pdf/export", post(handlers::export_pdf))
        .route("/document/process", post(handlers::process_document))
        .route("/id-card/scan", post(handlers::scan_id_card))
        .route("/documents", get(handlers::list_documents))
        .route(
            "/documents/{id}",
            get(handlers::get_document).delete(handlers::delete_document),
        )
        .route("/history", get(handlers::scan_history))
        .route("/batch/ocr", post(handlers::batch_ocr))
        .route("/batch/export-pdf", post(handlers::batch_export_pdf))
        .route("/advanced/add-watermark", post(handlers::add_watermark))
        .route("/advanced/remove-watermark", post(handlers::remove_watermark))
        .route("/advanced/translate-ocr", post(handlers::translate_ocr))
        .route("/batch/enhance", post(handlers::batch_enhance))
        .route("/advanced/create-long-image", post(handlers::create_long_image))
        .route("/advanced/create-grid-image", post(handlers::create_grid_image))
        .route("/advanced/export-word", post(handlers::export_word))
        .route("/advanced/export-excel", post(handlers::export_excel));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
