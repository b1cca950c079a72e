//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; a `Transport` (or any other host) executes the
//! actual I/O.
//!
//! Multipart bodies are kept structured (`MultipartForm`) rather than
//! pre-encoded, so a built request can be inspected field by field. The
//! transport turns the parts into its own multipart body and picks the
//! boundary.

use crate::types::Upload;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` already includes the client's base URL. Query pairs are kept
/// separate and unencoded; `url()` joins them.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Full request URL with the query string percent-encoded.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path)
    }

    /// Value of the first query parameter named `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<&str> {
        match &self.body {
            Some(RequestBody::Json(body)) => Some(body),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&MultipartForm> {
        match &self.body {
            Some(RequestBody::Multipart(form)) => Some(form),
            _ => None,
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized JSON; the request carries a matching `content-type` header.
    Json(String),
    /// `multipart/form-data`; the content type depends on the boundary and is
    /// set by whoever encodes the form.
    Multipart(MultipartForm),
}

/// An ordered `multipart/form-data` body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    File(Upload),
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    /// Booleans travel as the literal strings `"true"` / `"false"`.
    pub fn flag(self, name: &str, value: bool) -> Self {
        self.text(name, value.to_string())
    }

    pub fn file(mut self, name: &str, upload: &Upload) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            value: PartValue::File(upload.clone()),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// First text value named `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::Text(value) if part.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// All file parts named `name`, in insertion order.
    pub fn files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Upload> + 'a {
        self.parts.iter().filter_map(move |part| match &part.value {
            PartValue::File(upload) if part.name == name => Some(upload),
            _ => None,
        })
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_query_values() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost/documents".to_string(),
            query: vec![("user_id".to_string(), "a b&c".to_string())],
            headers: Vec::new(),
            body: None,
        };
        assert_eq!(req.url(), "http://localhost/documents?user_id=a%20b%26c");
        assert_eq!(req.query_param("user_id"), Some("a b&c"));
    }

    #[test]
    fn url_without_query_is_the_path() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost/history".to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        };
        assert_eq!(req.url(), "http://localhost/history");
    }

    #[test]
    fn flags_are_string_literals() {
        let form = MultipartForm::new().flag("enhance", true).flag("auto_crop", false);
        assert_eq!(form.field("enhance"), Some("true"));
        assert_eq!(form.field("auto_crop"), Some("false"));
    }

    #[test]
    fn parts_keep_insertion_order() {
        let first = Upload::new("1.png", b"one".to_vec());
        let second = Upload::new("2.png", b"two".to_vec());
        let form = MultipartForm::new()
            .file("files", &first)
            .file("files", &second)
            .text("user_id", "default");

        let names: Vec<_> = form.parts().iter().map(|part| part.name.as_str()).collect();
        assert_eq!(names, ["files", "files", "user_id"]);
        let files: Vec<_> = form.files("files").map(|f| f.file_name.as_str()).collect();
        assert_eq!(files, ["1.png", "2.png"]);
        assert!(form.files("file").next().is_none());
    }
}
