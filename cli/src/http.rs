use reqwest::multipart::{Form as MultipartForm, Part};
use shared::{ApiError, ErrorDetail, Form, FormField, MediaFile, Platform};
use std::time::Duration;

use crate::local_file::{LocalFile, LocalUrl};

/// Sends session requests to the remote detection and swap services.
#[derive(Clone, Debug, Default)]
pub struct HttpPlatform {
    client: reqwest::Client,
}

impl HttpPlatform {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// The hosted services spin down when idle, so the first request can take minutes.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client))
    }

    fn multipart(form: &Form<'_, LocalFile>) -> Result<MultipartForm, ApiError> {
        let mut multipart = MultipartForm::new();
        for field in form.fields() {
            multipart = match field {
                FormField::File { name, file } => {
                    let part = Part::bytes(file.bytes().to_vec())
                        .file_name(file.name())
                        .mime_str(&file.mime_type())
                        .map_err(ApiError::transport)?;
                    multipart.part(name.to_string(), part)
                }
                FormField::Text { name, value } => multipart.text(name.to_string(), value.clone()),
            };
        }
        Ok(multipart)
    }
}

impl Platform for HttpPlatform {
    type File = LocalFile;
    type Url = LocalUrl;

    async fn post_form(&self, url: &str, form: Form<'_, LocalFile>) -> Result<Vec<u8>, ApiError> {
        let multipart = Self::multipart(&form)?;
        log::debug!("POST {} ({} fields)", url, form.fields().len());

        let response = self
            .client
            .post(url)
            .multipart(multipart)
            .send()
            .await
            .map_err(ApiError::transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::transport)?;
        log::debug!("{} answered {} with {} bytes", url, status, body.len());

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: ErrorDetail::from_body(&body),
            });
        }
        Ok(body.to_vec())
    }

    fn file_url(&self, file: &LocalFile) -> LocalUrl {
        LocalUrl::for_file(file)
    }

    fn bytes_url(&self, bytes: &[u8], mime_type: &str) -> LocalUrl {
        LocalUrl::for_bytes(bytes, mime_type)
    }
}
