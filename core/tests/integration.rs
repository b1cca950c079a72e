//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port, then drives `ScanApi`
//! over real HTTP through `ReqwestTransport`. This validates that request
//! building, multipart encoding and response parsing agree with the server's
//! actual wire format.

use scan_core::types::{
    GridImageOptions, LongImageOptions, RemoveWatermarkOptions, TranslateOptions, WatermarkKind,
    WatermarkOptions,
};
use scan_core::{
    ApiError, IdCardOptions, ProcessOptions, ReqwestTransport, ScanApi, ScanClient, ScanOptions,
    Upload,
};

/// Start the mock server on a random port and return an API bound to it.
async fn start_server() -> ScanApi<ReqwestTransport> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));

    ScanApi::new(
        ScanClient::new(&format!("http://{addr}/api/v1")),
        ReqwestTransport::new(),
    )
}

fn upload(file_name: &str, content: &str) -> Upload {
    Upload::new(file_name, content.as_bytes().to_vec())
}

#[tokio::test]
async fn document_lifecycle() {
    let api = start_server().await;

    // Step 1: nothing stored yet.
    assert!(api.get_documents(None).await.unwrap().is_empty());
    assert!(api.get_scan_history(None).await.unwrap().is_empty());

    // Step 2: scan an ID card.
    let card = upload("card.jpg", "姓名 张三\n身份证 110101199001011234\n地址 北京市");
    let scanned = api.scan_id_card(&card, &IdCardOptions::default()).await.unwrap();
    assert_eq!(scanned.card_type, "id_card");
    assert_eq!(scanned.scan.ocr_result.count, 3);
    assert_eq!(scanned.id_info.name.as_deref(), Some("张三"));
    assert_eq!(scanned.id_info.id_number.as_deref(), Some("110101199001011234"));
    assert_eq!(scanned.id_info.address.as_deref(), Some("北京市"));
    let id = scanned.scan.document_id.clone();

    // Step 3: the document is listed.
    let documents = api.get_documents(None).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, id);
    assert_eq!(documents[0].kind, "id_card");
    assert!(documents[0].name.starts_with("id_card_"));

    // Step 4: other users see nothing.
    assert!(api.get_documents(Some("someone-else")).await.unwrap().is_empty());

    // Step 5: fetch the detail.
    let detail = api.get_document(&id, None).await.unwrap();
    assert_eq!(detail.document.id, id);
    assert_eq!(detail.text_count, 3);
    assert!(detail.text.contains("张三"));
    assert_eq!(detail.image_url.as_deref(), Some(scanned.scan.image_url.as_str()));

    // Step 6: history records the operation.
    let history = api.get_scan_history(None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "id_card_scan");
    assert_eq!(history[0].text_count, 3);

    // Step 7: delete.
    api.delete_document(&id, None).await.unwrap();

    // Step 8: get after delete is NotFound.
    let err = api.get_document(&id, None).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 9: delete again is NotFound.
    let err = api.delete_document(&id, None).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 10: the listing is empty again; history is kept.
    assert!(api.get_documents(None).await.unwrap().is_empty());
    assert_eq!(api.get_scan_history(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn scanning_operations() {
    let api = start_server().await;
    let page = upload("page.png", "first line\nsecond line");

    let ocr = api.ocr_image(&page, Some("en")).await.unwrap();
    assert_eq!(ocr.ocr_result.texts, ["first line", "second line"]);
    assert_eq!(ocr.ocr_result.positions.len(), 2);
    assert!(ocr.image_url.starts_with("/static/uploads/"));

    let raw = ScanOptions {
        enhance: false,
        auto_crop: false,
    };
    let scan = api.scan_document(&page, &raw).await.unwrap();
    assert!(scan.image_url.starts_with("/static/uploads/"));
    let scan = api.scan_document(&page, &ScanOptions::default()).await.unwrap();
    assert!(scan.image_url.starts_with("/static/processed/"));

    let processed = api.process_document(&page, &ProcessOptions::default()).await.unwrap();
    assert_eq!(processed.scan.ocr_result.count, 2);
    assert_eq!(
        processed.pdf_url,
        Some(format!("/static/pdf/{}.pdf", processed.scan.document_id))
    );

    let options = ProcessOptions {
        ocr: false,
        export_pdf: false,
        ..ProcessOptions::default()
    };
    let processed = api.process_document(&page, &options).await.unwrap();
    assert_eq!(processed.scan.ocr_result.count, 0);
    assert!(processed.pdf_url.is_none());

    let detail = api.get_document(&processed.scan.document_id, None).await.unwrap();
    assert_eq!(detail.text_count, 0);
    assert_eq!(detail.text, "");
    assert!(detail.image_url.is_some());

    assert_eq!(api.get_documents(None).await.unwrap().len(), 5);
}

#[tokio::test]
async fn pdf_export() {
    let api = start_server().await;

    let images = vec!["/static/processed/a.png".to_string()];
    let export = api.export_pdf(&images, None).await.unwrap();
    assert_eq!(export.pdf_url, "/static/pdf/document.pdf");

    let export = api.export_pdf(&images, Some("receipts.pdf")).await.unwrap();
    assert_eq!(export.pdf_url, "/static/pdf/receipts.pdf");

    let err = api.export_pdf(&[], None).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 422, .. }));
}

#[tokio::test]
async fn batch_operations() {
    let api = start_server().await;
    let files = vec![upload("1.png", "one"), upload("2.png", "")];

    let batch = api.batch_ocr(&files, None).await.unwrap();
    assert_eq!(batch.total, 2);
    assert!(batch.results[0].success);
    assert_eq!(batch.results[0].result.as_ref().unwrap().text, "one");
    assert!(!batch.results[1].success);
    assert_eq!(batch.results[1].image, "2.png");
    assert!(batch.results[1].error.is_some());

    let export = api.batch_export_pdf(&files, Some("all.pdf")).await.unwrap();
    assert_eq!(export.pdf_url, "/static/pdf/all.pdf");
    let export = api.batch_export_pdf(&files, None).await.unwrap();
    assert!(export.pdf_url.starts_with("/static/pdf/batch_"));
}

#[tokio::test]
async fn advanced_tools() {
    let api = start_server().await;
    let page = upload("page.jpg", "bonjour\nmonde");

    let marked = api.add_watermark(&page, &WatermarkOptions::default()).await.unwrap();
    assert!(marked.image_url.starts_with("/static/watermarked/"));
    assert!(marked.image_url.ends_with(".jpg"));

    let invalid = WatermarkOptions {
        opacity: 2.0,
        ..WatermarkOptions::default()
    };
    let err = api.add_watermark(&page, &invalid).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 422, .. }));

    let options = RemoveWatermarkOptions {
        kind: WatermarkKind::Logo,
        text: None,
    };
    let cleaned = api.remove_watermark(&page, &options).await.unwrap();
    assert!(cleaned.image_url.starts_with("/static/cleaned/"));

    let options = TranslateOptions {
        from_lang: "fr".to_string(),
        to_lang: "de".to_string(),
    };
    let translated = api.translate_ocr(&page, &options).await.unwrap();
    assert_eq!(translated.original_text, "bonjour\nmonde");
    assert_eq!(translated.translated_texts, ["[de] bonjour", "[de] monde"]);
    assert_eq!(translated.count, 2);
    assert_eq!(translated.positions.len(), 2);
}

#[tokio::test]
async fn composition_and_office_exports() {
    let api = start_server().await;
    let files = vec![upload("1.png", "one"), upload("2.jpg", "two")];

    let enhanced = api.batch_enhance(&files).await.unwrap();
    assert_eq!(enhanced.total, 2);
    assert_eq!(enhanced.enhanced_urls.len(), 2);
    assert!(enhanced.enhanced_urls[1].ends_with(".jpg"));

    let long = api.create_long_image(&files, &LongImageOptions::default()).await.unwrap();
    assert!(long.image_url.starts_with("/static/composed/long_"));

    let grid = api.create_grid_image(&files, &GridImageOptions::default()).await.unwrap();
    assert!(grid.image_url.starts_with("/static/composed/grid_"));

    let invalid = GridImageOptions {
        columns: 0,
        ..GridImageOptions::default()
    };
    let err = api.create_grid_image(&files, &invalid).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 422, .. }));

    let word = api.export_word("第一行\nsecond line", None).await.unwrap();
    assert!(word.word_url.ends_with(".docx"));

    let rows = vec!["a".to_string(), "b c".to_string()];
    let excel = api.export_excel(&rows, Some("Totals")).await.unwrap();
    assert!(excel.excel_url.ends_with(".xlsx"));

    let err = api.export_excel(&[], None).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 422, .. }));
}

#[tokio::test]
async fn unreachable_server_and_unknown_document() {
    let api = start_server().await;
    let unreachable = ScanApi::new(
        ScanClient::new("http://127.0.0.1:1/api/v1"),
        ReqwestTransport::new(),
    );

    let err = unreachable.get_documents(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));

    let err = api.get_document("does-not-exist", None).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}
