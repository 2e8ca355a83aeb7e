use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DetectedFace {
    pub image_base64: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DetectFacesResponse {
    pub faces: Vec<DetectedFace>,
}

/// Error body returned by the remote services on non-2xx replies.
#[derive(Deserialize, Debug)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// Extracts the `detail` message from a JSON error body, if any.
    pub fn from_body(body: &[u8]) -> Option<String> {
        let parsed: ErrorDetail = serde_json::from_slice(body).ok()?;
        match parsed.detail? {
            serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            // validation errors arrive as a list of objects
            other => Some(other.to_string()),
        }
    }
}

/// One detected face: its position in the target and a JPEG thumbnail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceRecord {
    pub index: usize,
    pub thumbnail: Vec<u8>,
}

impl FaceRecord {
    pub fn label(&self) -> String {
        format!("Face {}", self.index + 1)
    }

    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&self.thumbnail))
    }
}

impl DetectFacesResponse {
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn into_records(self) -> Result<Vec<FaceRecord>, ApiError> {
        self.faces
            .into_iter()
            .enumerate()
            .map(|(index, face)| {
                STANDARD
                    .decode(face.image_base64.trim())
                    .map(|thumbnail| FaceRecord { index, thumbnail })
                    .map_err(|e| ApiError::Decode(format!("face {} thumbnail: {}", index + 1, e)))
            })
            .collect()
    }
}
