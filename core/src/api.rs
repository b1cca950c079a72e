//! Async operations: build, one transport round trip, parse.
//!
//! # Design
//! `ScanApi` pairs a `ScanClient` with a `Transport`. Every method issues
//! exactly one request. Nothing is retried, cached or timed out here;
//! cancellation is dropping the future.

use tracing::{debug, warn};

use crate::client::ScanClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    BatchEnhanceResult, BatchOcrResult, Document, DocumentDetail, ExcelExport, GridImageOptions,
    IdCardOptions, IdCardResult, ImageResult, LongImageOptions, PdfExport, ProcessOptions,
    ProcessResult, RemoveWatermarkOptions, ScanHistoryItem, ScanOptions, ScanResult,
    TranslateOptions, TranslationResult, Upload, WatermarkOptions, WordExport,
};

#[derive(Debug, Clone)]
pub struct ScanApi<T> {
    client: ScanClient,
    transport: T,
}

impl<T: Transport> ScanApi<T> {
    pub fn new(client: ScanClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self::new(ScanClient::new(&config.base_url), transport)
    }

    pub fn client(&self) -> &ScanClient {
        &self.client
    }

    /// OCR one image. `lang` defaults to `"ch"`.
    pub async fn ocr_image(&self, file: &Upload, lang: Option<&str>) -> Result<ScanResult, ApiError> {
        let response = self.send(self.client.build_ocr_image(file, lang)).await?;
        self.client.parse_ocr_image(response)
    }

    pub async fn scan_document(
        &self,
        file: &Upload,
        options: &ScanOptions,
    ) -> Result<ScanResult, ApiError> {
        let response = self.send(self.client.build_scan_document(file, options)).await?;
        self.client.parse_scan_document(response)
    }

    /// `filename` defaults to `"document.pdf"`.
    pub async fn export_pdf(
        &self,
        images: &[String],
        filename: Option<&str>,
    ) -> Result<PdfExport, ApiError> {
        let response = self.send(self.client.build_export_pdf(images, filename)?).await?;
        self.client.parse_export_pdf(response)
    }

    pub async fn process_document(
        &self,
        file: &Upload,
        options: &ProcessOptions,
    ) -> Result<ProcessResult, ApiError> {
        let response = self.send(self.client.build_process_document(file, options)).await?;
        self.client.parse_process_document(response)
    }

    pub async fn scan_id_card(
        &self,
        file: &Upload,
        options: &IdCardOptions,
    ) -> Result<IdCardResult, ApiError> {
        let response = self.send(self.client.build_scan_id_card(file, options)).await?;
        self.client.parse_scan_id_card(response)
    }

    pub async fn get_documents(&self, user_id: Option<&str>) -> Result<Vec<Document>, ApiError> {
        let response = self.send(self.client.build_get_documents(user_id)).await?;
        self.client.parse_get_documents(response)
    }

    pub async fn get_document(
        &self,
        document_id: &str,
        user_id: Option<&str>,
    ) -> Result<DocumentDetail, ApiError> {
        let response = self
            .send(self.client.build_get_document(document_id, user_id))
            .await?;
        self.client.parse_get_document(response)
    }

    pub async fn delete_document(
        &self,
        document_id: &str,
        user_id: Option<&str>,
    ) -> Result<(), ApiError> {
        let response = self
            .send(self.client.build_delete_document(document_id, user_id))
            .await?;
        self.client.parse_delete_document(response)
    }

    pub async fn get_scan_history(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<ScanHistoryItem>, ApiError> {
        let response = self.send(self.client.build_get_scan_history(user_id)).await?;
        self.client.parse_get_scan_history(response)
    }

    pub async fn batch_ocr(
        &self,
        files: &[Upload],
        lang: Option<&str>,
    ) -> Result<BatchOcrResult, ApiError> {
        let response = self.send(self.client.build_batch_ocr(files, lang)).await?;
        self.client.parse_batch_ocr(response)
    }

    pub async fn batch_export_pdf(
        &self,
        files: &[Upload],
        filename: Option<&str>,
    ) -> Result<PdfExport, ApiError> {
        let response = self
            .send(self.client.build_batch_export_pdf(files, filename))
            .await?;
        self.client.parse_batch_export_pdf(response)
    }

    pub async fn add_watermark(
        &self,
        file: &Upload,
        options: &WatermarkOptions,
    ) -> Result<ImageResult, ApiError> {
        let response = self.send(self.client.build_add_watermark(file, options)).await?;
        self.client.parse_add_watermark(response)
    }

    pub async fn remove_watermark(
        &self,
        file: &Upload,
        options: &RemoveWatermarkOptions,
    ) -> Result<ImageResult, ApiError> {
        let response = self
            .send(self.client.build_remove_watermark(file, options))
            .await?;
        self.client.parse_remove_watermark(response)
    }

    pub async fn translate_ocr(
        &self,
        file: &Upload,
        options: &TranslateOptions,
    ) -> Result<TranslationResult, ApiError> {
        let response = self.send(self.client.build_translate_ocr(file, options)).await?;
        self.client.parse_translate_ocr(response)
    }

    pub async fn batch_enhance(&self, files: &[Upload]) -> Result<BatchEnhanceResult, ApiError> {
        let response = self.send(self.client.build_batch_enhance(files)).await?;
        self.client.parse_batch_enhance(response)
    }

    pub async fn create_long_image(
        &self,
        files: &[Upload],
        options: &LongImageOptions,
    ) -> Result<ImageResult, ApiError> {
        let response = self
            .send(self.client.build_create_long_image(files, options))
            .await?;
        self.client.parse_create_long_image(response)
    }

    pub async fn create_grid_image(
        &self,
        files: &[Upload],
        options: &GridImageOptions,
    ) -> Result<ImageResult, ApiError> {
        let response = self
            .send(self.client.build_create_grid_image(files, options))
            .await?;
        self.client.parse_create_grid_image(response)
    }

    /// `title` defaults to `"文档"`.
    pub async fn export_word(&self, text: &str, title: Option<&str>) -> Result<WordExport, ApiError> {
        let response = self.send(self.client.build_export_word(text, title)).await?;
        self.client.parse_export_word(response)
    }

    /// `sheet_name` defaults to `"Sheet1"`.
    pub async fn export_excel(
        &self,
        texts: &[String],
        sheet_name: Option<&str>,
    ) -> Result<ExcelExport, ApiError> {
        let response = self
            .send(self.client.build_export_excel(texts, sheet_name))
            .await?;
        self.client.parse_export_excel(response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        debug!(method, path = %path, "sending request");

        match self.transport.execute(request).await {
            Ok(response) => {
                debug!(method, path = %path, status = response.status, "received response");
                Ok(response)
            }
            Err(e) => {
                warn!(method, path = %path, error = %e, "transport failed");
                Err(ApiError::Transport(Box::new(e)))
            }
        }
    }
}
