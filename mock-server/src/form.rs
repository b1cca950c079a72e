use std::collections::HashMap;

use axum::extract::Multipart;

use crate::{ApiFailure, DEFAULT_USER_ID};

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "png".to_string())
    }
}

/// A fully read `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiFailure> {
        let mut form = FormData::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiFailure::new(e.status(), e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiFailure::new(e.status(), e.body_text()))?
                        .to_vec();
                    form.files.push((
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    ));
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiFailure::new(e.status(), e.body_text()))?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn text_or(&self, name: &str, default: &str) -> String {
        self.text(name).unwrap_or(default).to_string()
    }

    pub fn user_id(&self) -> String {
        self.text_or("user_id", DEFAULT_USER_ID)
    }

    /// Accepts the same spellings as the backend's form parser.
    pub fn flag(&self, name: &str, default: bool) -> Result<bool, ApiFailure> {
        match self.text(name).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(default),
            Some(v) => match v.as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(ApiFailure::unprocessable(format!(
                    "{name}: value could not be parsed to a boolean"
                ))),
            },
        }
    }

    pub fn number(&self, name: &str, default: u32) -> Result<u32, ApiFailure> {
        match self.text(name) {
            None => Ok(default),
            Some(v) => v.trim().parse().map_err(|_| {
                ApiFailure::unprocessable(format!("{name}: value is not a valid integer"))
            }),
        }
    }

    pub fn file(&self, name: &str) -> Result<&UploadedFile, ApiFailure> {
        self.files(name)
            .into_iter()
            .next()
            .ok_or_else(|| ApiFailure::unprocessable(format!("{name}: field required")))
    }

    pub fn files(&self, name: &str) -> Vec<&UploadedFile> {
        self.files
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, file)| file)
            .collect()
    }
}
