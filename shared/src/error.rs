use crate::config::format_megabytes;
use crate::mode::Mode;

/// Failures reported by a platform while talking to the remote services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),
    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Option<String> },
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::Transport(err.to_string())
    }

    /// Human-readable cause, or `None` when a non-2xx reply carried no detail.
    pub fn cause(&self) -> Option<String> {
        match self {
            ApiError::Status { detail, .. } => detail.clone(),
            other => Some(other.to_string()),
        }
    }
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("HTTP {}", status),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Detection,
    Swap,
}

/// Every message a session can surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Source image too large (max {}).", megabytes(.limit))]
    SourceTooLarge { limit: u64 },
    #[error("Target {mode} too large (max {}).", megabytes(.limit))]
    TargetTooLarge { mode: Mode, limit: u64 },
    #[error("Please upload both a source image and a target {0}.")]
    MissingFiles(Mode),
    #[error("Please upload a target image or video.")]
    NoTarget,
    #[error("Please select a face from the target.")]
    FaceSelectionRequired,
    #[error("No faces detected in the target.")]
    NoFacesDetected,
    #[error("Failed to detect faces: {0}")]
    DetectionFailed(ApiError),
    #[error("Failed to swap faces in {mode}{}", cause_suffix(.cause))]
    SwapFailed { mode: Mode, cause: Option<String> },
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::SourceTooLarge { .. }
            | SessionError::TargetTooLarge { .. }
            | SessionError::MissingFiles(_)
            | SessionError::NoTarget
            | SessionError::FaceSelectionRequired => ErrorKind::Validation,
            SessionError::NoFacesDetected | SessionError::DetectionFailed(_) => {
                ErrorKind::Detection
            }
            SessionError::SwapFailed { .. } => ErrorKind::Swap,
        }
    }
}

fn megabytes(limit: &u64) -> String {
    format_megabytes(*limit)
}

fn cause_suffix(cause: &Option<String>) -> String {
    match cause {
        Some(cause) => format!(": {}", cause),
        None => ".".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            SessionError::TargetTooLarge { mode: Mode::Video, limit: 50_000_000 }.to_string(),
            "Target video too large (max 50MB)."
        );
        assert_eq!(
            SessionError::MissingFiles(Mode::Image).to_string(),
            "Please upload both a source image and a target image."
        );
        assert_eq!(
            SessionError::SwapFailed { mode: Mode::Image, cause: None }.to_string(),
            "Failed to swap faces in image."
        );
        let status = ApiError::Status { status: 502, detail: None };
        assert_eq!(
            SessionError::DetectionFailed(status).to_string(),
            "Failed to detect faces: HTTP 502"
        );
    }

    #[test]
    fn kinds_group_messages() {
        assert_eq!(SessionError::SourceTooLarge { limit: 5_000_000 }.kind(), ErrorKind::Validation);
        assert_eq!(SessionError::FaceSelectionRequired.kind(), ErrorKind::Validation);
        assert_eq!(SessionError::NoFacesDetected.kind(), ErrorKind::Detection);
        let status = ApiError::Status { status: 502, detail: None };
        assert_eq!(SessionError::DetectionFailed(status).kind(), ErrorKind::Detection);
        assert_eq!(
            SessionError::SwapFailed { mode: Mode::Video, cause: None }.kind(),
            ErrorKind::Swap
        );
    }

    #[test]
    fn cause_prefers_detail() {
        let err = ApiError::Status { status: 500, detail: Some("server overloaded".into()) };
        assert_eq!(err.cause().as_deref(), Some("server overloaded"));
        assert_eq!(ApiError::Status { status: 500, detail: None }.cause(), None);
        assert_eq!(
            ApiError::transport("connection refused").cause().as_deref(),
            Some("connection refused")
        );
    }
}
