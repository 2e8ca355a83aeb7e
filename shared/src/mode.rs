use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Whether the active swap targets an image or a video.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    Image,
    Video,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Image => "Image",
            Mode::Video => "Video",
        }
    }

    /// Value for the `accept` attribute of the target file input.
    pub fn accept(self) -> &'static str {
        match self {
            Mode::Image => "image/*",
            Mode::Video => "video/mp4,video/webm",
        }
    }

    pub fn result_file_name(self) -> &'static str {
        match self {
            Mode::Image => "faceswap_result.jpg",
            Mode::Video => "faceswap_result.mp4",
        }
    }

    pub fn result_mime_type(self) -> &'static str {
        match self {
            Mode::Image => "image/jpeg",
            Mode::Video => "video/mp4",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_and_displays_lowercase() {
        assert_eq!(Mode::from_str("video").unwrap(), Mode::Video);
        assert_eq!(Mode::Image.to_string(), "image");
        assert!(Mode::from_str("gif").is_err());
    }
}
