//! Request and response shapes for the scanning API.
//!
//! # Design
//! These types mirror the backend's JSON but are defined independently of
//! the mock-server crate; integration tests catch schema drift. Rust names
//! are snake_case and the few camelCase wire names are kept through serde
//! renames. Option structs implement `Default` with the service's documented
//! defaults and deserialize with `#[serde(default)]`, so a partial options
//! object fills in the rest.

use serde::{Deserialize, Serialize};

/// User id sent with every request. There is no session concept at this layer.
pub const DEFAULT_USER_ID: &str = "default";
pub const DEFAULT_OCR_LANG: &str = "ch";
pub const DEFAULT_PDF_FILENAME: &str = "document.pdf";
pub const DEFAULT_CARD_TYPE: &str = "id_card";
pub const DEFAULT_WATERMARK_TEXT: &str = "智扫通";
pub const DEFAULT_WATERMARK_POSITION: &str = "bottom_right";
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.3;
pub const DEFAULT_LONG_IMAGE_SPACING: u32 = 20;
pub const DEFAULT_GRID_COLUMNS: u32 = 2;
pub const DEFAULT_GRID_SPACING: u32 = 10;
pub const DEFAULT_WORD_TITLE: &str = "文档";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// A point as `[x, y]`.
pub type Point = [f64; 2];

/// A text region outline, one point per corner.
pub type Polygon = Vec<Point>;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A file to upload as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Build an upload, inferring the content type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Options for `scan_document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub enhance: bool,
    pub auto_crop: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            enhance: true,
            auto_crop: true,
        }
    }
}

/// Options for `process_document`. Every step is on unless switched off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    pub enhance: bool,
    pub auto_crop: bool,
    pub ocr: bool,
    pub export_pdf: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            enhance: true,
            auto_crop: true,
            ocr: true,
            export_pdf: true,
        }
    }
}

/// Options for `scan_id_card`. `card_type` is one of the backend's card
/// kinds (`id_card`, `passport`, `license`, `graduation`, `student_card`);
/// unknown kinds are passed through and yield an empty `id_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdCardOptions {
    pub card_type: String,
    pub enhance: bool,
    pub auto_crop: bool,
}

impl Default for IdCardOptions {
    fn default() -> Self {
        Self {
            card_type: DEFAULT_CARD_TYPE.to_string(),
            enhance: true,
            auto_crop: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkOptions {
    pub text: String,
    pub position: String,
    pub opacity: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: DEFAULT_WATERMARK_TEXT.to_string(),
            position: DEFAULT_WATERMARK_POSITION.to_string(),
            opacity: DEFAULT_WATERMARK_OPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    #[default]
    Text,
    Logo,
}

impl WatermarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkKind::Text => "text",
            WatermarkKind::Logo => "logo",
        }
    }
}

/// Options for `remove_watermark`. `text` is only sent when set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveWatermarkOptions {
    pub kind: WatermarkKind,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    pub from_lang: String,
    pub to_lang: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            from_lang: "zh".to_string(),
            to_lang: "en".to_string(),
        }
    }
}

/// Options for `create_long_image`: pixels between stacked images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongImageOptions {
    pub spacing: u32,
}

impl Default for LongImageOptions {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_LONG_IMAGE_SPACING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridImageOptions {
    pub columns: u32,
    pub spacing: u32,
}

impl Default for GridImageOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            spacing: DEFAULT_GRID_SPACING,
        }
    }
}

/// JSON body of `POST /pdf/export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPdfRequest {
    pub images: Vec<String>,
    pub filename: String,
    pub user_id: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Recognized text of one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    /// All lines joined with `\n`.
    pub text: String,
    pub texts: Vec<String>,
    pub positions: Vec<Polygon>,
    pub count: u32,
}

/// `document_id` is empty when the backend did not store the scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub document_id: String,
    pub image_url: String,
    pub ocr_result: OcrResult,
}

/// `process_document` result; `pdf_url` is present when a PDF was exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    #[serde(flatten)]
    pub scan: ScanResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

/// Fields extracted from an ID card. Absent when unrecognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdCardResult {
    #[serde(flatten)]
    pub scan: ScanResult,
    pub card_type: String,
    #[serde(default)]
    pub id_info: IdInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfExport {
    pub pdf_url: String,
}

/// A stored document as listed by `GET /documents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: Option<String>,
    pub status: String,
    /// Opaque backend metadata; no schema is assumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub text: String,
    /// Zero when the document has no recognized text.
    #[serde(rename = "textCount", default)]
    pub text_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanHistoryItem {
    pub id: String,
    pub name: String,
    pub timestamp: Option<String>,
    #[serde(rename = "textCount")]
    pub text_count: u32,
}

/// Per-image outcome of `batch_ocr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOcrItem {
    pub success: bool,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<OcrResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOcrResult {
    pub total: u32,
    pub results: Vec<BatchOcrItem>,
}

/// A single processed or composed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    pub translated_texts: Vec<String>,
    pub positions: Vec<Polygon>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEnhanceResult {
    pub total: u32,
    pub enhanced_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordExport {
    pub word_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcelExport {
    pub excel_url: String,
}
