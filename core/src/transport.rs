//! The I/O seam: something that turns an `HttpRequest` into an `HttpResponse`.
//!
//! Non-2xx statuses are data, not transport errors; `ScanClient` interprets
//! them. A transport only fails when no response came back.

use std::future::Future;

use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use reqwest::multipart::{Form, Part};

    use super::Transport;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, PartValue, RequestBody};

    /// `Transport` backed by a shared `reqwest::Client`.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl Transport for ReqwestTransport {
        type Error = reqwest::Error;

        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };
            let mut builder = self.client.request(method, &request.path).query(&request.query);
            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            builder = match request.body {
                Some(RequestBody::Json(body)) => builder.body(body),
                Some(RequestBody::Multipart(form)) => builder.multipart(to_reqwest_form(&form)?),
                None => builder,
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
                .collect();
            let body = response.text().await?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn to_reqwest_form(form: &MultipartForm) -> Result<Form, reqwest::Error> {
        let mut out = Form::new();
        for part in form.parts() {
            out = match &part.value {
                PartValue::Text(value) => out.text(part.name.clone(), value.clone()),
                PartValue::File(upload) => {
                    let file = Part::bytes(upload.bytes.clone())
                        .file_name(upload.file_name.clone())
                        .mime_str(&upload.content_type)?;
                    out.part(part.name.clone(), file)
                }
            };
        }
        Ok(out)
    }
}
