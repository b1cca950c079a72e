//! Stateless HTTP request builder and response parser for the scanning API.
//!
//! # Design
//! `ScanClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `ScanApi` glues the two halves to a transport; hosts that do their own
//! I/O can use this type directly.
//!
//! Every request that identifies a user sends `DEFAULT_USER_ID`. Read
//! operations take an optional user id that falls back to it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
use crate::types::{
    BatchEnhanceResult, BatchOcrResult, Document, DocumentDetail, ExcelExport, ExportPdfRequest,
    GridImageOptions, IdCardOptions, IdCardResult, ImageResult, LongImageOptions, PdfExport,
    ProcessOptions, ProcessResult, RemoveWatermarkOptions, ScanHistoryItem, ScanOptions,
    ScanResult, TranslateOptions, TranslationResult, Upload, WatermarkOptions, WordExport,
    DEFAULT_OCR_LANG, DEFAULT_PDF_FILENAME, DEFAULT_SHEET_NAME, DEFAULT_USER_ID,
    DEFAULT_WORD_TITLE,
};

/// Synchronous, stateless client for the scanning API.
#[derive(Debug, Clone)]
pub struct ScanClient {
    base_url: String,
}

impl ScanClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    pub fn build_ocr_image(&self, file: &Upload, lang: Option<&str>) -> HttpRequest {
        let form = MultipartForm::new()
            .file("file", file)
            .text("lang", lang.unwrap_or(DEFAULT_OCR_LANG))
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/ocr", form)
    }

    pub fn build_scan_document(&self, file: &Upload, options: &ScanOptions) -> HttpRequest {
        let form = MultipartForm::new()
            .file("file", file)
            .flag("enhance", options.enhance)
            .flag("auto_crop", options.auto_crop)
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/scan", form)
    }

    pub fn build_export_pdf(
        &self,
        images: &[String],
        filename: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let input = ExportPdfRequest {
            images: images.to_vec(),
            filename: filename.unwrap_or(DEFAULT_PDF_FILENAME).to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        };
        let body = serde_json::to_string(&input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url("/pdf/export"),
            query: Vec::new(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(RequestBody::Json(body)),
        })
    }

    pub fn build_process_document(&self, file: &Upload, options: &ProcessOptions) -> HttpRequest {
        let form = MultipartForm::new()
            .file("file", file)
            .flag("enhance", options.enhance)
            .flag("auto_crop", options.auto_crop)
            .flag("ocr", options.ocr)
            .flag("export_pdf", options.export_pdf)
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/document/process", form)
    }

    pub fn build_scan_id_card(&self, file: &Upload, options: &IdCardOptions) -> HttpRequest {
        let form = MultipartForm::new()
            .file("file", file)
            .text("card_type", options.card_type.as_str())
            .flag("enhance", options.enhance)
            .flag("auto_crop", options.auto_crop)
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/id-card/scan", form)
    }

    pub fn build_get_documents(&self, user_id: Option<&str>) -> HttpRequest {
        self.bodiless(HttpMethod::Get, "/documents".to_string(), user_id)
    }

    pub fn build_get_document(&self, document_id: &str, user_id: Option<&str>) -> HttpRequest {
        self.bodiless(HttpMethod::Get, document_path(document_id), user_id)
    }

    pub fn build_delete_document(&self, document_id: &str, user_id: Option<&str>) -> HttpRequest {
        self.bodiless(HttpMethod::Delete, document_path(document_id), user_id)
    }

    pub fn build_get_scan_history(&self, user_id: Option<&str>) -> HttpRequest {
        self.bodiless(HttpMethod::Get, "/history".to_string(), user_id)
    }

    /// One `files` part per upload, in order.
    pub fn build_batch_ocr(&self, files: &[Upload], lang: Option<&str>) -> HttpRequest {
        let form = files_form(files)
            .text("lang", lang.unwrap_or(DEFAULT_OCR_LANG))
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/batch/ocr", form)
    }

    pub fn build_batch_enhance(&self, files: &[Upload]) -> HttpRequest {
        let form = files_form(files).text("user_id", DEFAULT_USER_ID);
        self.multipart("/batch/enhance", form)
    }

    /// Without a `filename` the server picks one.
    pub fn build_batch_export_pdf(&self, files: &[Upload], filename: Option<&str>) -> HttpRequest {
        let mut form = files_form(files);
        if let Some(filename) = filename {
            form = form.text("filename", filename);
        }
        self.multipart("/batch/export-pdf", form.text("user_id", DEFAULT_USER_ID))
    }

    pub fn build_add_watermark(&self, file: &Upload, options: &WatermarkOptions) -> HttpRequest {
        let form = MultipartForm::new()
            .file("file", file)
            .text("watermark_text", options.text.as_str())
            .text("position", options.position.as_str())
            .text("opacity", options.opacity.to_string())
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/advanced/add-watermark", form)
    }

    pub fn build_remove_watermark(
        &self,
        file: &Upload,
        options: &RemoveWatermarkOptions,
    ) -> HttpRequest {
        let mut form = MultipartForm::new()
            .file("file", file)
            .text("watermark_type", options.kind.as_str());
        if let Some(text) = &options.text {
            form = form.text("watermark_text", text.as_str());
        }
        self.multipart("/advanced/remove-watermark", form.text("user_id", DEFAULT_USER_ID))
    }

    pub fn build_translate_ocr(&self, file: &Upload, options: &TranslateOptions) -> HttpRequest {
        let form = MultipartForm::new()
            .file("file", file)
            .text("from_lang", options.from_lang.as_str())
            .text("to_lang", options.to_lang.as_str())
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/advanced/translate-ocr", form)
    }

    /// Stack `files` vertically into one image.
    pub fn build_create_long_image(&self, files: &[Upload], options: &LongImageOptions) -> HttpRequest {
        let form = files_form(files)
            .text("spacing", options.spacing.to_string())
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/advanced/create-long-image", form)
    }

    pub fn build_create_grid_image(&self, files: &[Upload], options: &GridImageOptions) -> HttpRequest {
        let form = files_form(files)
            .text("columns", options.columns.to_string())
            .text("spacing", options.spacing.to_string())
            .text("user_id", DEFAULT_USER_ID);
        self.multipart("/advanced/create-grid-image", form)
    }

    /// `text` travels in the query string; the title is a form field.
    pub fn build_export_word(&self, text: &str, title: Option<&str>) -> HttpRequest {
        let form = MultipartForm::new()
            .text("title", title.unwrap_or(DEFAULT_WORD_TITLE))
            .text("user_id", DEFAULT_USER_ID);
        let mut request = self.multipart("/advanced/export-word", form);
        request.query.push(("text".to_string(), text.to_string()));
        request
    }

    /// One `texts` query pair per row, in order.
    pub fn build_export_excel(&self, texts: &[String], sheet_name: Option<&str>) -> HttpRequest {
        let form = MultipartForm::new()
            .text("sheet_name", sheet_name.unwrap_or(DEFAULT_SHEET_NAME))
            .text("user_id", DEFAULT_USER_ID);
        let mut request = self.multipart("/advanced/export-excel", form);
        request.query = texts
            .iter()
            .map(|text| ("texts".to_string(), text.clone()))
            .collect();
        request
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_ocr_image(&self, response: HttpResponse) -> Result<ScanResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_scan_document(&self, response: HttpResponse) -> Result<ScanResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_export_pdf(&self, response: HttpResponse) -> Result<PdfExport, ApiError> {
        parse_json(response)
    }

    pub fn parse_process_document(&self, response: HttpResponse) -> Result<ProcessResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_scan_id_card(&self, response: HttpResponse) -> Result<IdCardResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_documents(&self, response: HttpResponse) -> Result<Vec<Document>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_document(&self, response: HttpResponse) -> Result<DocumentDetail, ApiError> {
        parse_json(response)
    }

    /// Success or failure only; the body is not part of the contract.
    pub fn parse_delete_document(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_get_scan_history(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ScanHistoryItem>, ApiError> {
        parse_json(response)
    }

    pub fn parse_batch_ocr(&self, response: HttpResponse) -> Result<BatchOcrResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_batch_export_pdf(&self, response: HttpResponse) -> Result<PdfExport, ApiError> {
        parse_json(response)
    }

    pub fn parse_add_watermark(&self, response: HttpResponse) -> Result<ImageResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_remove_watermark(&self, response: HttpResponse) -> Result<ImageResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_translate_ocr(&self, response: HttpResponse) -> Result<TranslationResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_batch_enhance(&self, response: HttpResponse) -> Result<BatchEnhanceResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_long_image(&self, response: HttpResponse) -> Result<ImageResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_grid_image(&self, response: HttpResponse) -> Result<ImageResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_export_word(&self, response: HttpResponse) -> Result<WordExport, ApiError> {
        parse_json(response)
    }

    pub fn parse_export_excel(&self, response: HttpResponse) -> Result<ExcelExport, ApiError> {
        parse_json(response)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn multipart(&self, path: &str, form: MultipartForm) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: self.url(path),
            query: Vec::new(),
            headers: Vec::new(),
            body: Some(RequestBody::Multipart(form)),
        }
    }

    fn bodiless(&self, method: HttpMethod, path: String, user_id: Option<&str>) -> HttpRequest {
        HttpRequest {
            method,
            path: self.url(&path),
            query: vec![(
                "user_id".to_string(),
                user_id.unwrap_or(DEFAULT_USER_ID).to_string(),
            )],
            headers: Vec::new(),
            body: None,
        }
    }
}

/// One `files` part per upload, in order.
fn files_form(files: &[Upload]) -> MultipartForm {
    files
        .iter()
        .fold(MultipartForm::new(), |form, file| form.file("files", file))
}

fn document_path(document_id: &str) -> String {
    format!("/documents/{}", urlencoding::encode(document_id))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    decode_payload(&response.body)
}

/// Decode a response body that is either the bare payload or wrapped as
/// `{"success": bool, "data": payload, "message": string}`.
fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    let payload = match value {
        Value::Object(mut map) if map.get("success").is_some_and(Value::is_boolean) => {
            if map.get("success") == Some(&Value::Bool(false)) {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request failed")
                    .to_string();
                return Err(ApiError::Rejected(message));
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
