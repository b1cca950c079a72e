use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::form::{FormData, UploadedFile};
use crate::recognize::{extract_id_info, recognize};
use crate::{ApiFailure, Db, StoredDocument, DEFAULT_USER_ID, HISTORY_LIMIT};

const WATERMARK_POSITIONS: [&str; 5] = ["top_left", "top_right", "bottom_left", "bottom_right", "center"];

type ApiResult = Result<Json<Value>, ApiFailure>;

#[derive(Deserialize)]
pub struct UserQuery {
    #[serde(default = "default_user")]
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct ExportPdfInput {
    pub images: Vec<String>,
    #[serde(default = "default_pdf_filename")]
    pub filename: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_user() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_pdf_filename() -> String {
    "document.pdf".to_string()
}

fn success(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn image_url(dir: &str, id: &str, file: &UploadedFile) -> String {
    format!("/static/{dir}/{id}.{}", file.extension())
}

fn new_document(user_id: String, name: String, kind: &str, file: &UploadedFile) -> StoredDocument {
    StoredDocument {
        id: Uuid::new_v4().to_string(),
        user_id,
        name,
        kind: kind.to_string(),
        created_at: now(),
        status: "success".to_string(),
        metadata: json!({ "file_size": file.bytes.len(), "content_type": file.content_type }),
        ocr: None,
        image_url: None,
    }
}

fn scan_payload(document: &StoredDocument) -> Value {
    json!({
        "document_id": document.id,
        "image_url": document.image_url,
        "ocr_result": document.ocr.clone().unwrap_or_default(),
    })
}

fn required_files<'a>(form: &'a FormData) -> Result<Vec<&'a UploadedFile>, ApiFailure> {
    let files = form.files("files");
    if files.is_empty() {
        return Err(ApiFailure::unprocessable("files: field required"));
    }
    Ok(files)
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

pub async fn ocr_image(State(db): State<Db>, multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let file = form.file("file")?;
    let lang = form.text_or("lang", "ch");

    let mut document = new_document(form.user_id(), file.file_name.clone(), "ocr", file);
    document.image_url = Some(image_url("uploads", &document.id, file));
    document.ocr = Some(recognize(&file.bytes));
    document.metadata["lang"] = json!(lang);

    let payload = scan_payload(&document);
    tracing::info!(id = %document.id, lang = %lang, count = document.text_count(), "ocr");
    db.write().await.insert(document, "ocr");
    Ok(success(payload))
}

pub async fn scan_document(State(db): State<Db>, multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let file = form.file("file")?;
    let enhance = form.flag("enhance", true)?;
    let auto_crop = form.flag("auto_crop", true)?;

    let mut document = new_document(form.user_id(), file.file_name.clone(), "scan", file);
    let dir = if enhance || auto_crop { "processed" } else { "uploads" };
    document.image_url = Some(image_url(dir, &document.id, file));
    document.ocr = Some(recognize(&file.bytes));

    let payload = scan_payload(&document);
    tracing::info!(id = %document.id, enhance, auto_crop, "scan");
    db.write().await.insert(document, "scan");
    Ok(success(payload))
}

pub async fn export_pdf(Json(input): Json<ExportPdfInput>) -> ApiResult {
    if input.images.is_empty() {
        return Err(ApiFailure::unprocessable("images: at least one image is required"));
    }
    tracing::info!(images = input.images.len(), filename = %input.filename, user_id = %input.user_id, "pdf export");
    Ok(success(json!({ "pdf_url": format!("/static/pdf/{}", input.filename) })))
}

pub async fn process_document(State(db): State<Db>, multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let file = form.file("file")?;
    let enhance = form.flag("enhance", true)?;
    let auto_crop = form.flag("auto_crop", true)?;
    let ocr = form.flag("ocr", true)?;
    let export_pdf = form.flag("export_pdf", true)?;

    let mut document = new_document(form.user_id(), file.file_name.clone(), "document", file);
    let dir = if enhance || auto_crop { "processed" } else { "uploads" };
    document.image_url = Some(image_url(dir, &document.id, file));
    if ocr {
        document.ocr = Some(recognize(&file.bytes));
    }

    let mut payload = scan_payload(&document);
    if export_pdf {
        payload["pdf_url"] = json!(format!("/static/pdf/{}.pdf", document.id));
    }
    tracing::info!(id = %document.id, enhance, auto_crop, ocr, export_pdf, "process");
    db.write().await.insert(document, "process");
    Ok(success(payload))
}

pub async fn scan_id_card(State(db): State<Db>, multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let file = form.file("file")?;
    let card_type = form.text_or("card_type", "id_card");
    let enhance = form.flag("enhance", true)?;
    let auto_crop = form.flag("auto_crop", true)?;

    let name = format!("{card_type}_{}", short_id());
    let mut document = new_document(form.user_id(), name, &card_type, file);
    let dir = if enhance || auto_crop { "processed" } else { "uploads" };
    document.image_url = Some(image_url(dir, &document.id, file));
    let ocr = recognize(&file.bytes);
    let id_info = extract_id_info(&card_type, &ocr.text);
    document.ocr = Some(ocr);

    let mut payload = scan_payload(&document);
    payload["card_type"] = json!(card_type);
    payload["id_info"] = json!(id_info);
    tracing::info!(id = %document.id, card_type = %card_type, "id card scan");
    db.write().await.insert(document, "id_card_scan");
    Ok(success(payload))
}

// ---------------------------------------------------------------------------
// Documents and history
// ---------------------------------------------------------------------------

pub async fn list_documents(State(db): State<Db>, Query(query): Query<UserQuery>) -> Json<Vec<Value>> {
    let store = db.read().await;
    Json(
        store
            .documents
            .iter()
            .rev()
            .filter(|d| d.user_id == query.user_id)
            .map(StoredDocument::summary)
            .collect(),
    )
}

pub async fn get_document(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult {
    let store = db.read().await;
    store
        .documents
        .iter()
        .find(|d| d.id == id && d.user_id == query.user_id)
        .map(|d| Json(d.detail()))
        .ok_or_else(|| ApiFailure::not_found("document not found"))
}

pub async fn delete_document(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult {
    let mut store = db.write().await;
    let index = store
        .documents
        .iter()
        .position(|d| d.id == id && d.user_id == query.user_id)
        .ok_or_else(|| ApiFailure::not_found("document not found"))?;
    store.documents.remove(index);
    tracing::info!(id = %id, "document deleted");
    Ok(Json(json!({ "success": true, "message": "document deleted" })))
}

pub async fn scan_history(State(db): State<Db>, Query(query): Query<UserQuery>) -> Json<Vec<Value>> {
    let store = db.read().await;
    Json(
        store
            .history
            .iter()
            .rev()
            .filter(|h| h.user_id == query.user_id)
            .take(HISTORY_LIMIT)
            .map(|h| {
                json!({
                    "id": h.id,
                    "name": h.operation,
                    "timestamp": h.created_at,
                    "textCount": h.text_count,
                })
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

pub async fn batch_ocr(multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let files = required_files(&form)?;

    let results: Vec<Value> = files
        .iter()
        .map(|file| {
            if file.bytes.is_empty() {
                json!({ "success": false, "image": file.file_name, "error": "empty image" })
            } else {
                json!({ "success": true, "image": file.file_name, "result": recognize(&file.bytes) })
            }
        })
        .collect();
    tracing::info!(total = files.len(), lang = %form.text_or("lang", "ch"), "batch ocr");
    Ok(success(json!({ "total": files.len(), "results": results })))
}

pub async fn batch_export_pdf(multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let files = required_files(&form)?;
    let filename = form
        .text("filename")
        .map(str::to_string)
        .unwrap_or_else(|| format!("batch_{}.pdf", short_id()));
    tracing::info!(total = files.len(), filename = %filename, "batch pdf export");
    Ok(success(json!({ "pdf_url": format!("/static/pdf/{filename}") })))
}

// ---------------------------------------------------------------------------
// Advanced
// ---------------------------------------------------------------------------

pub async fn add_watermark(multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let file = form.file("file")?;
    let text = form.text_or("watermark_text", "智扫通");
    let position = form.text_or("position", "bottom_right");
    if !WATERMARK_POSITIONS.contains(&position.as_str()) {
        return Err(ApiFailure::unprocessable(format!("position: unsupported value {position}")));
    }
    let opacity: f32 = form
        .text_or("opacity", "0.3")
        .trim()
        .parse()
        .map_err(|_| ApiFailure::unprocessable("opacity: value is not a valid float"))?;
    if !(0.0..=1.0).contains(&opacity) {
        return Err(ApiFailure::unprocessable("opacity: must be between 0 and 1"));
    }

    tracing::info!(text = %text, position = %position, opacity, "add watermark");
    let id = Uuid::new_v4().to_string();
    Ok(success(json!({ "image_url": image_url("watermarked", &id, file) })))
}

pub async fn remove_watermark(multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let file = form.file("file")?;
    let kind = form.text_or("watermark_type", "text");
    if kind != "text" && kind != "logo" {
        return Err(ApiFailure::unprocessable(format!("watermark_type: unsupported value {kind}")));
    }

    tracing::info!(kind = %kind, text = ?form.text("watermark_text"), "remove watermark");
    let id = Uuid::new_v4().to_string();
    Ok(success(json!({ "image_url": image_url("cleaned", &id, file) })))
}

pub async fn translate_ocr(multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let file = form.file("file")?;
    let from_lang = form.text_or("from_lang", "zh");
    let to_lang = form.text_or("to_lang", "en");

    let ocr = recognize(&file.bytes);
    let translated_texts: Vec<String> = ocr.texts.iter().map(|t| format!("[{to_lang}] {t}")).collect();
    tracing::info!(from = %from_lang, to = %to_lang, count = translated_texts.len(), "translate ocr");
    Ok(success(json!({
        "original_text": ocr.text,
        "translated_text": format!("[{to_lang}] {}", ocr.text),
        "count": translated_texts.len(),
        "translated_texts": translated_texts,
        "positions": ocr.positions,
    })))
}

// ---------------------------------------------------------------------------
// Batch enhance and image composition
// ---------------------------------------------------------------------------

pub async fn batch_enhance(multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let files = required_files(&form)?;
    let enhanced_urls: Vec<String> = files
        .iter()
        .map(|file| image_url("enhanced", &Uuid::new_v4().to_string(), file))
        .collect();
    tracing::info!(total = files.len(), "batch enhance");
    Ok(success(json!({ "total": files.len(), "enhanced_urls": enhanced_urls })))
}

pub async fn create_long_image(multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let files = required_files(&form)?;
    let spacing = form.number("spacing", 20)?;
    tracing::info!(images = files.len(), spacing, "long image");
    Ok(success(json!({ "image_url": format!("/static/composed/long_{}.png", short_id()) })))
}

pub async fn create_grid_image(multipart: Multipart) -> ApiResult {
    let form = FormData::read(multipart).await?;
    let files = required_files(&form)?;
    let columns = form.number("columns", 2)?;
    if columns == 0 {
        return Err(ApiFailure::unprocessable("columns: must be at least 1"));
    }
    let spacing = form.number("spacing", 10)?;
    tracing::info!(images = files.len(), columns, spacing, "grid image");
    Ok(success(json!({ "image_url": format!("/static/composed/grid_{}.png", short_id()) })))
}

// ---------------------------------------------------------------------------
// Office export
// ---------------------------------------------------------------------------

fn query_values<'a>(query: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    query
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .collect()
}

pub async fn export_word(
    Query(query): Query<Vec<(String, String)>>,
    multipart: Multipart,
) -> ApiResult {
    let text = query_values(&query, "text")
        .first()
        .map(|text| text.to_string())
        .ok_or_else(|| ApiFailure::unprocessable("text: field required"))?;
    let form = FormData::read(multipart).await?;
    let title = form.text_or("title", "文档");
    tracing::info!(title = %title, chars = text.chars().count(), "word export");
    Ok(success(json!({ "word_url": format!("/static/office/{}.docx", short_id()) })))
}

pub async fn export_excel(
    Query(query): Query<Vec<(String, String)>>,
    multipart: Multipart,
) -> ApiResult {
    let rows = query_values(&query, "texts");
    if rows.is_empty() {
        return Err(ApiFailure::unprocessable("texts: field required"));
    }
    let form = FormData::read(multipart).await?;
    let sheet_name = form.text_or("sheet_name", "Sheet1");
    tracing::info!(sheet = %sheet_name, rows = rows.len(), "excel export");
    Ok(success(json!({ "excel_url": format!("/static/office/{}.xlsx", short_id()) })))
}
