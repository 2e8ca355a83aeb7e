use std::ops::Deref;

use crate::error::ApiError;
use crate::media::MediaFile;

pub enum FormField<'a, F> {
    File { name: &'a str, file: &'a F },
    Text { name: &'a str, value: String },
}

/// A multipart form, built by the session and sent by a [`Platform`].
pub struct Form<'a, F> {
    fields: Vec<FormField<'a, F>>,
}

impl<'a, F> Form<'a, F> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn file(mut self, name: &'a str, file: &'a F) -> Self {
        self.fields.push(FormField::File { name, file });
        self
    }

    pub fn text(mut self, name: &'a str, value: impl ToString) -> Self {
        self.fields.push(FormField::Text { name, value: value.to_string() });
        self
    }

    pub fn fields(&self) -> &[FormField<'a, F>] {
        &self.fields
    }
}

impl<F> Default for Form<'_, F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the session needs from its environment: sending multipart
/// requests and minting displayable resource URLs.
///
/// Dropping a `Url` releases the resource behind it.
#[allow(async_fn_in_trait)]
pub trait Platform {
    type File: MediaFile;
    type Url: Deref<Target = str>;

    /// POSTs `form` to `url`. Returns the body of a 2xx reply, otherwise
    /// [`ApiError::Status`] with the `detail` of the error body.
    async fn post_form(&self, url: &str, form: Form<'_, Self::File>) -> Result<Vec<u8>, ApiError>;

    fn file_url(&self, file: &Self::File) -> Self::Url;

    fn bytes_url(&self, bytes: &[u8], mime_type: &str) -> Self::Url;
}
