use shared::{ConfigError, SwapConfig};
use std::path::Path;

pub const DETECT_URL_VAR: &str = "FACESWAP_DETECT_URL";
pub const SWAP_IMAGE_URL_VAR: &str = "FACESWAP_SWAP_IMAGE_URL";
pub const SWAP_VIDEO_URL_VAR: &str = "FACESWAP_SWAP_VIDEO_URL";

/// Reads the YAML config when a path is given, otherwise starts from the
/// reference deployment, then applies endpoint overrides from the environment.
pub fn load_config(path: Option<&Path>) -> Result<SwapConfig, ConfigError> {
    let mut config = match path {
        Some(path) => SwapConfig::load(path)?,
        None => SwapConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

pub fn apply_env_overrides(config: &mut SwapConfig, lookup: impl Fn(&str) -> Option<String>) {
    let endpoints = &mut config.endpoints;
    let overrides = [
        (DETECT_URL_VAR, &mut endpoints.detect_faces),
        (SWAP_IMAGE_URL_VAR, &mut endpoints.swap_image),
        (SWAP_VIDEO_URL_VAR, &mut endpoints.swap_video),
    ];
    for (key, slot) in overrides {
        if let Some(value) = lookup(key) {
            log::info!("{} overrides endpoint {}", key, slot);
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn env_overrides_replace_endpoints() {
        let vars = HashMap::from([(SWAP_VIDEO_URL_VAR, "http://localhost:9000/video")]);
        let mut config = SwapConfig::default();
        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.endpoints.swap_video, "http://localhost:9000/video");
        assert_eq!(config.endpoints.swap_image, SwapConfig::default().endpoints.swap_image);
    }

    #[test]
    fn loads_file_and_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limits:\n  source_max_bytes: 1000").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.limits.source_max_bytes, 1000);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "endpoints:\n  swap_image: \"\"").unwrap();
        assert!(matches!(load_config(Some(bad.path())), Err(ConfigError::Invalid(_))));
    }
}
