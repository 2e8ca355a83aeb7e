pub mod api;
pub mod config;
pub mod error;
pub mod media;
pub mod mode;
pub mod platform;
pub mod session;

pub use api::{DetectFacesResponse, DetectedFace, ErrorDetail, FaceRecord};
pub use config::{ConfigError, FaceIndexPolicy, SwapConfig};
pub use error::{ApiError, ErrorKind, SessionError};
pub use media::MediaFile;
pub use mode::Mode;
pub use platform::{Form, FormField, Platform};
pub use session::{
    DetectOutcome, DetectPurpose, DetectStart, DetectionTicket, Session, SessionEvent,
    SubmitLabel, SubmitOutcome, SubmitStep, SwapResult, SwapTicket,
};
