//! Deterministic stand-in for the backend's recognizer.
//!
//! Each non-blank line of the uploaded bytes (read as lossy UTF-8) becomes
//! one text region, laid out top to bottom on a fixed grid.

use crate::{IdInfo, OcrResult};

const LINE_HEIGHT: f64 = 24.0;
const CHAR_WIDTH: f64 = 12.0;

pub fn recognize(bytes: &[u8]) -> OcrResult {
    let content = String::from_utf8_lossy(bytes);
    let texts: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    let positions = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let top = i as f64 * LINE_HEIGHT;
            let right = text.chars().count() as f64 * CHAR_WIDTH;
            vec![
                [0.0, top],
                [right, top],
                [right, top + LINE_HEIGHT],
                [0.0, top + LINE_HEIGHT],
            ]
        })
        .collect();

    OcrResult {
        text: texts.join("\n"),
        count: texts.len() as u32,
        texts,
        positions,
    }
}

/// Pull card fields out of recognized text by keyword. Unknown card types
/// and missing keywords leave fields empty.
pub fn extract_id_info(card_type: &str, text: &str) -> IdInfo {
    let name = || value_after(text, &["姓名", "Name"]);
    match card_type {
        "id_card" => IdInfo {
            name: name(),
            id_number: value_after(text, &["身份证", "ID"]),
            address: value_after(text, &["地址", "Address"]),
        },
        "passport" => IdInfo {
            name: name(),
            id_number: value_after(text, &["护照", "Passport"]),
            address: None,
        },
        "license" => IdInfo {
            name: name(),
            id_number: value_after(text, &["驾驶证", "License"]),
            address: None,
        },
        "graduation" | "student_card" => IdInfo {
            name: name(),
            id_number: value_after(text, &["学号", "ID"]),
            address: None,
        },
        _ => IdInfo::default(),
    }
}

/// Rest of the line after the first keyword found, without separators.
fn value_after(text: &str, keywords: &[&str]) -> Option<String> {
    keywords.iter().find_map(|keyword| {
        let start = text.find(keyword)? + keyword.len();
        let value = text[start..]
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches([':', '：', ' '])
            .trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}
