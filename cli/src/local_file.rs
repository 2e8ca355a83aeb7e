use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::MediaFile;
use shared::media::mime_from_extension;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CliError;

/// A file read from disk into memory. Clones share the buffer.
#[derive(Clone, Debug)]
pub struct LocalFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
    path: Option<PathBuf>,
}

impl LocalFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_from_extension(&name).unwrap_or("application/octet-stream");
        log::debug!("Read {} ({} bytes, {})", path.display(), bytes.len(), mime_type);

        Ok(Self {
            mime_type: mime_type.to_string(),
            name,
            bytes: bytes.into(),
            path: std::fs::canonicalize(path).ok(),
        })
    }

    pub fn from_bytes(name: &str, mime_type: &str, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.into(),
            path: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl MediaFile for LocalFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn renamed(&self, name: &str, mime_type: &str) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            ..self.clone()
        }
    }
}

/// A `file://` URL for files on disk, or a `data:` URL for in-memory bytes.
#[derive(Debug, Clone)]
pub struct LocalUrl(String);

impl LocalUrl {
    pub fn for_file(file: &LocalFile) -> Self {
        match file.path().and_then(|path| url::Url::from_file_path(path).ok()) {
            Some(url) => LocalUrl(url.into()),
            None => Self::for_bytes(file.bytes(), &file.mime_type),
        }
    }

    pub fn for_bytes(bytes: &[u8], mime_type: &str) -> Self {
        LocalUrl(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)))
    }
}

impl Deref for LocalUrl {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_reads_bytes_and_guesses_type() {
        let mut tmp = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
        tmp.write_all(b"png-bytes").unwrap();

        let file = LocalFile::open(tmp.path()).unwrap();
        assert_eq!(file.size(), 9);
        assert_eq!(file.mime_type(), "image/png");
        assert!(LocalUrl::for_file(&file).starts_with("file://"));

        let renamed = file.renamed("source.jpg", "image/jpeg");
        assert_eq!(renamed.name(), "source.jpg");
        assert_eq!(renamed.bytes(), b"png-bytes");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = LocalFile::open("/definitely/not/here.jpg").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_codes::IO);
    }

    #[test]
    fn in_memory_files_get_data_urls() {
        let file = LocalFile::from_bytes("a.jpg", "image/jpeg", b"abc".to_vec());
        assert_eq!(&*LocalUrl::for_file(&file), "data:image/jpeg;base64,YWJj");
    }
}
