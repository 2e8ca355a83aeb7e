pub const SOURCE_FILE_NAME: &str = "source.jpg";
pub const TARGET_IMAGE_FILE_NAME: &str = "target.jpg";
pub const TARGET_VIDEO_FILE_NAME: &str = "target.mp4";

/// A user-selected file as seen by the session. Implementations are cheap
/// handles (a browser `File`, a shared byte buffer) so cloning is fine.
pub trait MediaFile: Clone {
    fn name(&self) -> String;
    fn size(&self) -> u64;
    fn mime_type(&self) -> String;
    /// Returns the same contents under a new name and MIME type.
    fn renamed(&self, name: &str, mime_type: &str) -> Self;
}

/// Renames an image, re-typing it as JPEG unless it already is one.
pub fn as_jpeg<F: MediaFile>(file: &F, name: &str) -> F {
    let original = file.name().to_lowercase();
    let mime_type = file.mime_type();
    if (original.ends_with(".jpg") || original.ends_with(".jpeg")) && !mime_type.is_empty() {
        file.renamed(name, &mime_type)
    } else {
        file.renamed(name, "image/jpeg")
    }
}

pub fn keep_type<F: MediaFile>(file: &F, name: &str) -> F {
    file.renamed(name, &file.mime_type())
}

/// Guesses a MIME type from a file extension.
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}
