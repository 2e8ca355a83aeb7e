use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::mode::Mode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Deployment settings: size limits, service endpoints, multipart field names
/// and the policies that differ between deployments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    pub limits: SizeLimits,
    pub endpoints: Endpoints,
    pub fields: FieldNames,
    pub policy: Policy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    pub source_max_bytes: u64,
    pub target_image_max_bytes: u64,
    pub target_video_max_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub detect_faces: String,
    pub swap_image: String,
    pub swap_video: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub detect_target: String,
    pub source: String,
    pub target: String,
    pub video_source: String,
    pub video_target: String,
    pub face_index: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Run face detection for video targets as well as image targets.
    pub detect_video_targets: bool,
    pub face_index: FaceIndexPolicy,
}

/// When the `face_index` field is attached to a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceIndexPolicy {
    /// Always sent, defaulting to 0.
    Always,
    /// Sent whenever a face is selected.
    #[default]
    WhenSelected,
    /// Sent for image swaps only, defaulting to 0.
    ImageOnly,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            source_max_bytes: 5_000_000,
            target_image_max_bytes: 5_000_000,
            target_video_max_bytes: 50_000_000,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            detect_faces: "https://face-detection-pkw8.onrender.com/detect-faces/".to_string(),
            swap_image: "https://face-swap-api-7fb0.onrender.com/swap-faces/".to_string(),
            swap_video: "https://face-swap-api-7fb0.onrender.com/swap-faces-video/".to_string(),
        }
    }
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            detect_target: "target".to_string(),
            source: "source".to_string(),
            target: "target".to_string(),
            video_source: "source".to_string(),
            video_target: "target".to_string(),
            face_index: "face_index".to_string(),
        }
    }
}

impl SizeLimits {
    pub fn target_max(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Image => self.target_image_max_bytes,
            Mode::Video => self.target_video_max_bytes,
        }
    }
}

impl Endpoints {
    pub fn swap(&self, mode: Mode) -> &str {
        match mode {
            Mode::Image => &self.swap_image,
            Mode::Video => &self.swap_video,
        }
    }
}

impl FieldNames {
    pub fn source(&self, mode: Mode) -> &str {
        match mode {
            Mode::Image => &self.source,
            Mode::Video => &self.video_source,
        }
    }

    pub fn target(&self, mode: Mode) -> &str {
        match mode {
            Mode::Image => &self.target,
            Mode::Video => &self.video_target,
        }
    }
}

impl SwapConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SwapConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Loading swap config from {}", path.display());
        let config_str = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&config_str)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("limits.source_max_bytes", self.limits.source_max_bytes),
            ("limits.target_image_max_bytes", self.limits.target_image_max_bytes),
            ("limits.target_video_max_bytes", self.limits.target_video_max_bytes),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{} must be greater than zero", name)));
        }

        let strings = [
            ("endpoints.detect_faces", &self.endpoints.detect_faces),
            ("endpoints.swap_image", &self.endpoints.swap_image),
            ("endpoints.swap_video", &self.endpoints.swap_video),
            ("fields.detect_target", &self.fields.detect_target),
            ("fields.source", &self.fields.source),
            ("fields.target", &self.fields.target),
            ("fields.video_source", &self.fields.video_source),
            ("fields.video_target", &self.fields.video_target),
            ("fields.face_index", &self.fields.face_index),
        ];
        if let Some((name, _)) = strings.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
        }

        Ok(())
    }
}

/// Renders a byte count the way limits are shown to users, e.g. `5MB`.
pub fn format_megabytes(bytes: u64) -> String {
    if bytes % 1_000_000 == 0 {
        format!("{}MB", bytes / 1_000_000)
    } else {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_file_matches_defaults() {
        let yaml = include_str!("../../config/faceswap.yaml");
        let config = SwapConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config, SwapConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r#"
limits:
  target_video_max_bytes: 100000000
fields:
  video_source: source_image
  video_target: target_video
policy:
  detect_video_targets: true
  face_index: image_only
"#;
        let config = SwapConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.limits.target_max(Mode::Video), 100_000_000);
        assert_eq!(config.limits.source_max_bytes, 5_000_000);
        assert_eq!(config.fields.source(Mode::Video), "source_image");
        assert_eq!(config.fields.target(Mode::Image), "target");
        assert!(config.policy.detect_video_targets);
        assert_eq!(config.policy.face_index, FaceIndexPolicy::ImageOnly);
    }

    #[test]
    fn rejects_zero_limits_and_blank_fields() {
        let err = SwapConfig::from_yaml_str("limits:\n  source_max_bytes: 0\n").unwrap_err();
        assert!(err.to_string().contains("limits.source_max_bytes"));

        let mut config = SwapConfig::default();
        config.fields.face_index = " ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn megabytes() {
        assert_eq!(format_megabytes(5_000_000), "5MB");
        assert_eq!(format_megabytes(100_000_000), "100MB");
        assert_eq!(format_megabytes(2_500_000), "2.5MB");
    }
}
