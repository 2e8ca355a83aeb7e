use gloo_file::{Blob, File as GlooFile, ObjectUrl};
use gloo_net::http::Request;
use shared::{ApiError, ErrorDetail, Form, FormField, MediaFile, Platform};
use wasm_bindgen::JsValue;
use web_sys::{FilePropertyBag, FormData};

/// A file picked through an `<input type="file">`.
#[derive(Clone)]
pub struct BrowserFile(GlooFile);

impl From<GlooFile> for BrowserFile {
    fn from(file: GlooFile) -> Self {
        BrowserFile(file)
    }
}

impl MediaFile for BrowserFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn size(&self) -> u64 {
        self.0.size()
    }

    fn mime_type(&self) -> String {
        self.0.raw_mime_type()
    }

    fn renamed(&self, name: &str, mime_type: &str) -> Self {
        let options = FilePropertyBag::new();
        options.set_type(mime_type);
        let blob: &web_sys::Blob = self.0.as_ref();
        let parts = js_sys::Array::of1(blob);

        match web_sys::File::new_with_blob_sequence_and_options(&parts, name, &options) {
            Ok(file) => BrowserFile(GlooFile::from(file)),
            Err(err) => {
                log::error!("Failed to rename {} to {}: {:?}", self.0.name(), name, err);
                self.clone()
            }
        }
    }
}

/// Sends forms with `fetch` and hands out `blob:` object URLs, which are
/// revoked when dropped.
#[derive(Clone, Default)]
pub struct BrowserPlatform;

fn js_error(err: JsValue) -> ApiError {
    ApiError::Transport(format!("{:?}", err))
}

impl Platform for BrowserPlatform {
    type File = BrowserFile;
    type Url = ObjectUrl;

    async fn post_form(&self, url: &str, form: Form<'_, BrowserFile>) -> Result<Vec<u8>, ApiError> {
        let form_data = FormData::new().map_err(js_error)?;
        for field in form.fields() {
            match field {
                FormField::File { name, file } => {
                    form_data.append_with_blob_and_filename(name, file.0.as_ref(), &file.0.name())
                }
                FormField::Text { name, value } => form_data.append_with_str(name, value),
            }
            .map_err(js_error)?;
        }

        let response = Request::post(url)
            .body(form_data)
            .map_err(ApiError::transport)?
            .send()
            .await
            .map_err(ApiError::transport)?;

        let status = response.status();
        let ok = response.ok();
        let body = response.binary().await.map_err(ApiError::transport)?;
        if !ok {
            log::warn!("POST {} failed with status {}", url, status);
            return Err(ApiError::Status { status, detail: ErrorDetail::from_body(&body) });
        }
        Ok(body)
    }

    fn file_url(&self, file: &BrowserFile) -> ObjectUrl {
        ObjectUrl::from(file.0.clone())
    }

    fn bytes_url(&self, bytes: &[u8], mime_type: &str) -> ObjectUrl {
        ObjectUrl::from(Blob::new_with_options(bytes, Some(mime_type)))
    }
}
