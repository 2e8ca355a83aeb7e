//! Client-side state for one face swap attempt.
//!
//! Network calls are split into a synchronous `begin_*` step that hands out a
//! ticket, the platform request, and a synchronous `finish_*` step. Event-loop
//! frontends drive the three steps themselves; async callers use
//! [`Session::detect_faces`] and [`Session::submit`]. Every ticket carries a
//! request id, and replies for a superseded request are dropped.

use std::fmt;

use crate::api::{DetectFacesResponse, FaceRecord};
use crate::config::{FaceIndexPolicy, SwapConfig};
use crate::error::{ApiError, SessionError};
use crate::media::{self, MediaFile};
use crate::mode::Mode;
use crate::platform::{Form, Platform};

/// An accepted upload and its preview URL.
pub struct Asset<F, U> {
    file: F,
    preview: U,
}

impl<F: MediaFile, U: std::ops::Deref<Target = str>> Asset<F, U> {
    pub fn file(&self) -> &F {
        &self.file
    }

    pub fn preview_url(&self) -> &str {
        &self.preview
    }
}

pub struct SwapResult<U> {
    kind: Mode,
    bytes: Vec<u8>,
    url: U,
}

impl<U: std::ops::Deref<Target = str>> SwapResult<U> {
    pub fn kind(&self) -> Mode {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn file_name(&self) -> &'static str {
        self.kind.result_file_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectPurpose {
    Upload,
    Manual,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectOutcome {
    /// Exactly one face was found and selected.
    Ready,
    /// Several faces were found; the user has to pick one.
    SelectionRequired { faces: usize },
    Failed,
    NotApplicable,
    /// A swap is in flight.
    Busy,
    /// The target changed while the request was in flight.
    Superseded,
}

impl DetectOutcome {
    pub fn can_proceed(self) -> bool {
        self == DetectOutcome::Ready
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed,
    Failed,
    Aborted,
    Superseded,
}

impl SubmitOutcome {
    pub fn succeeded(self) -> bool {
        self == SubmitOutcome::Completed
    }
}

pub struct DetectionTicket<F> {
    request_id: u64,
    purpose: DetectPurpose,
    endpoint: String,
    field: String,
    target: F,
}

impl<F> DetectionTicket<F> {
    pub fn purpose(&self) -> DetectPurpose {
        self.purpose
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn form(&self) -> Form<'_, F> {
        Form::new().file(&self.field, &self.target)
    }
}

pub struct SwapTicket<F> {
    request_id: u64,
    mode: Mode,
    endpoint: String,
    source_field: String,
    target_field: String,
    source: F,
    target: F,
    face_index: Option<(String, usize)>,
}

impl<F> SwapTicket<F> {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn face_index(&self) -> Option<usize> {
        self.face_index.as_ref().map(|(_, index)| *index)
    }

    pub fn form(&self) -> Form<'_, F> {
        let form = Form::new()
            .file(&self.source_field, &self.source)
            .file(&self.target_field, &self.target);
        match &self.face_index {
            Some((name, index)) => form.text(name, index),
            None => form,
        }
    }
}

pub enum DetectStart<F> {
    Request(DetectionTicket<F>),
    Finished(DetectOutcome),
}

pub enum SubmitStep<F> {
    Detect(DetectionTicket<F>),
    Swap(SwapTicket<F>),
    Aborted,
}

/// State-change notifications for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ModeChanged(Mode),
    SourceChanged,
    TargetChanged,
    FacesChanged(usize),
    SelectionChanged(Option<usize>),
    LoadingChanged(bool),
    ErrorChanged(Option<String>),
    ResultChanged(Option<Mode>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitLabel {
    Processing,
    SelectFace,
    Swap(Mode),
}

impl fmt::Display for SubmitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitLabel::Processing => write!(f, "Processing..."),
            SubmitLabel::SelectFace => write!(f, "Select a Face"),
            SubmitLabel::Swap(mode) => write!(f, "Swap Faces in {}", mode.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Detection(u64),
    Swap(u64),
}

type AssetOf<P> = Asset<<P as Platform>::File, <P as Platform>::Url>;

pub struct Session<P: Platform> {
    platform: P,
    config: SwapConfig,
    mode: Mode,
    source: Option<AssetOf<P>>,
    target: Option<AssetOf<P>>,
    faces: Vec<FaceRecord>,
    selected_face: Option<usize>,
    in_flight: Option<InFlight>,
    error: Option<String>,
    result: Option<SwapResult<P::Url>>,
    last_request_id: u64,
    listeners: Vec<Box<dyn Fn(&SessionEvent)>>,
}

impl<P: Platform> Session<P> {
    pub fn new(platform: P, config: SwapConfig) -> Self {
        Self {
            platform,
            config,
            mode: Mode::default(),
            source: None,
            target: None,
            faces: Vec::new(),
            selected_face: None,
            in_flight: None,
            error: None,
            result: None,
            last_request_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn source(&self) -> Option<&AssetOf<P>> {
        self.source.as_ref()
    }

    pub fn target(&self) -> Option<&AssetOf<P>> {
        self.target.as_ref()
    }

    pub fn faces(&self) -> &[FaceRecord] {
        &self.faces
    }

    pub fn selected_face(&self) -> Option<usize> {
        self.selected_face
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&SwapResult<P::Url>> {
        self.result.as_ref()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&SessionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Whether face detection runs for the current mode.
    pub fn detection_applies(&self) -> bool {
        self.mode == Mode::Image || self.config.policy.detect_video_targets
    }

    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("Switching mode to {}", mode);
        self.mode = mode;
        self.release_all();
        self.set_error(None);
        self.emit(SessionEvent::ModeChanged(mode));
    }

    /// Releases every asset, preview and result URL. The mode is kept.
    pub fn teardown(&mut self) {
        self.release_all();
    }

    pub fn set_source(&mut self, file: Option<P::File>) -> Result<(), SessionError> {
        self.invalidate_swap();

        let Some(file) = file else {
            if self.source.take().is_some() {
                log::debug!("Source cleared");
                self.emit(SessionEvent::SourceChanged);
            }
            return Ok(());
        };

        let limit = self.config.limits.source_max_bytes;
        if file.size() > limit {
            log::warn!("Source image too large: {} bytes", file.size());
            if self.source.take().is_some() {
                self.emit(SessionEvent::SourceChanged);
            }
            return Err(self.fail(SessionError::SourceTooLarge { limit }));
        }

        let file = media::as_jpeg(&file, media::SOURCE_FILE_NAME);
        self.source = None;
        let preview = self.platform.file_url(&file);
        log::info!("Source image set: {} ({} bytes)", file.name(), file.size());
        self.source = Some(Asset { file, preview });
        self.set_error(None);
        self.emit(SessionEvent::SourceChanged);
        Ok(())
    }

    /// Accepts or clears the target. When detection applies to the mode the
    /// returned ticket must be run and handed back to [`Session::finish_detection`].
    pub fn set_target(
        &mut self,
        file: Option<P::File>,
    ) -> Result<Option<DetectionTicket<P::File>>, SessionError> {
        if self.in_flight.take().is_some() {
            log::debug!("Target changed, dropping in-flight request");
            self.emit(SessionEvent::LoadingChanged(false));
        }
        self.clear_faces();

        let Some(file) = file else {
            if self.target.take().is_some() {
                log::debug!("Target cleared");
                self.emit(SessionEvent::TargetChanged);
            }
            return Ok(None);
        };

        let mode = self.mode;
        let limit = self.config.limits.target_max(mode);
        if file.size() > limit {
            log::warn!("Target {} too large: {} bytes", mode, file.size());
            if self.target.take().is_some() {
                self.emit(SessionEvent::TargetChanged);
            }
            return Err(self.fail(SessionError::TargetTooLarge { mode, limit }));
        }

        let file = match mode {
            Mode::Image => media::as_jpeg(&file, media::TARGET_IMAGE_FILE_NAME),
            Mode::Video => media::keep_type(&file, media::TARGET_VIDEO_FILE_NAME),
        };
        self.target = None;
        let preview = self.platform.file_url(&file);
        log::info!("Target {} set: {} ({} bytes)", mode, file.name(), file.size());
        self.target = Some(Asset { file, preview });
        self.set_error(None);
        self.emit(SessionEvent::TargetChanged);

        if !self.detection_applies() {
            return Ok(None);
        }
        match self.begin_detection(DetectPurpose::Upload) {
            DetectStart::Request(ticket) => Ok(Some(ticket)),
            DetectStart::Finished(_) => Ok(None),
        }
    }

    /// [`Session::set_target`] followed by the detection it triggers.
    pub async fn upload_target(
        &mut self,
        file: Option<P::File>,
    ) -> Result<Option<DetectOutcome>, SessionError> {
        match self.set_target(file)? {
            Some(ticket) => Ok(Some(self.run_detection(ticket).await)),
            None => Ok(None),
        }
    }

    pub fn begin_detection(&mut self, purpose: DetectPurpose) -> DetectStart<P::File> {
        if !self.detection_applies() {
            log::debug!("Face detection does not apply to {} targets", self.mode);
            return DetectStart::Finished(DetectOutcome::NotApplicable);
        }
        if let Some(InFlight::Swap(_)) = self.in_flight {
            log::warn!("Face detection requested while a swap is in flight");
            return DetectStart::Finished(DetectOutcome::Busy);
        }
        let Some(target) = self.target.as_ref().map(|asset| asset.file.clone()) else {
            self.fail(SessionError::NoTarget);
            return DetectStart::Finished(DetectOutcome::Failed);
        };

        let request_id = self.next_request_id();
        if let Some(InFlight::Detection(previous)) = self.in_flight {
            log::debug!("Detection {} superseded by {}", previous, request_id);
        }
        self.set_in_flight(Some(InFlight::Detection(request_id)));
        self.set_error(None);
        log::info!("Sending {} for face detection (request {})", target.name(), request_id);

        DetectStart::Request(DetectionTicket {
            request_id,
            purpose,
            endpoint: self.config.endpoints.detect_faces.clone(),
            field: self.config.fields.detect_target.clone(),
            target,
        })
    }

    pub fn finish_detection(
        &mut self,
        ticket: DetectionTicket<P::File>,
        reply: Result<Vec<u8>, ApiError>,
    ) -> DetectOutcome {
        if self.in_flight != Some(InFlight::Detection(ticket.request_id)) {
            log::debug!("Discarding stale detection reply (request {})", ticket.request_id);
            return DetectOutcome::Superseded;
        }
        self.set_in_flight(None);

        let faces = match reply
            .and_then(|body| DetectFacesResponse::from_body(&body))
            .and_then(DetectFacesResponse::into_records)
        {
            Ok(faces) => faces,
            Err(err) => {
                self.fail(SessionError::DetectionFailed(err));
                return DetectOutcome::Failed;
            }
        };

        let count = faces.len();
        match count {
            0 => {
                self.clear_faces();
                self.fail(SessionError::NoFacesDetected);
                DetectOutcome::Failed
            }
            1 => {
                log::info!("Single face detected, auto-selected");
                self.faces = faces;
                self.selected_face = Some(0);
                self.emit(SessionEvent::FacesChanged(1));
                self.emit(SessionEvent::SelectionChanged(Some(0)));
                DetectOutcome::Ready
            }
            _ => {
                log::info!("{} faces detected, waiting for a selection", count);
                self.faces = faces;
                self.selected_face = None;
                self.emit(SessionEvent::FacesChanged(count));
                self.emit(SessionEvent::SelectionChanged(None));
                DetectOutcome::SelectionRequired { faces: count }
            }
        }
    }

    pub async fn run_detection(&mut self, ticket: DetectionTicket<P::File>) -> DetectOutcome {
        let reply = self.platform.post_form(ticket.endpoint(), ticket.form()).await;
        self.finish_detection(ticket, reply)
    }

    pub async fn detect_faces(&mut self) -> DetectOutcome {
        match self.begin_detection(DetectPurpose::Manual) {
            DetectStart::Request(ticket) => self.run_detection(ticket).await,
            DetectStart::Finished(outcome) => outcome,
        }
    }

    /// Selects face `index`, or clears the selection if it is already selected.
    pub fn select_face(&mut self, index: usize) {
        if index >= self.faces.len() {
            log::warn!("Ignoring selection of face {}: {} detected", index, self.faces.len());
            return;
        }
        self.selected_face = if self.selected_face == Some(index) { None } else { Some(index) };
        log::debug!("Face selection: {:?}", self.selected_face);
        self.emit(SessionEvent::SelectionChanged(self.selected_face));
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading()
            && self.source.is_some()
            && self.target.is_some()
            && !self.needs_face_selection()
    }

    pub fn submit_label(&self) -> SubmitLabel {
        if self.is_loading() {
            SubmitLabel::Processing
        } else if self.needs_face_selection() {
            SubmitLabel::SelectFace
        } else {
            SubmitLabel::Swap(self.mode)
        }
    }

    pub fn begin_submit(&mut self) -> SubmitStep<P::File> {
        if self.is_loading() {
            log::warn!("Submit ignored: a request is already in flight");
            return SubmitStep::Aborted;
        }

        let mode = self.mode;
        let files = (
            self.source.as_ref().map(|asset| asset.file.clone()),
            self.target.as_ref().map(|asset| asset.file.clone()),
        );
        let (Some(source), Some(target)) = files else {
            self.fail(SessionError::MissingFiles(mode));
            return SubmitStep::Aborted;
        };

        if self.detection_applies() {
            if self.faces.is_empty() {
                log::debug!("No faces detected yet, detecting before submit");
                return match self.begin_detection(DetectPurpose::Submit) {
                    DetectStart::Request(ticket) => SubmitStep::Detect(ticket),
                    DetectStart::Finished(_) => SubmitStep::Aborted,
                };
            }
            if self.needs_face_selection() {
                self.fail(SessionError::FaceSelectionRequired);
                return SubmitStep::Aborted;
            }
        } else if self.selected_face.is_none() {
            self.selected_face = Some(0);
            self.emit(SessionEvent::SelectionChanged(Some(0)));
        }

        let face_index = match self.config.policy.face_index {
            FaceIndexPolicy::Always => Some(self.selected_face.unwrap_or(0)),
            FaceIndexPolicy::WhenSelected => self.selected_face,
            FaceIndexPolicy::ImageOnly => {
                (mode == Mode::Image).then(|| self.selected_face.unwrap_or(0))
            }
        };

        let request_id = self.next_request_id();
        self.set_in_flight(Some(InFlight::Swap(request_id)));
        self.set_error(None);
        self.clear_result();
        log::info!(
            "Submitting {} swap (request {}, face index {:?})",
            mode,
            request_id,
            face_index
        );

        let fields = &self.config.fields;
        SubmitStep::Swap(SwapTicket {
            request_id,
            mode,
            endpoint: self.config.endpoints.swap(mode).to_string(),
            source_field: fields.source(mode).to_string(),
            target_field: fields.target(mode).to_string(),
            source,
            target,
            face_index: face_index.map(|index| (fields.face_index.clone(), index)),
        })
    }

    pub fn finish_swap(
        &mut self,
        ticket: SwapTicket<P::File>,
        reply: Result<Vec<u8>, ApiError>,
    ) -> SubmitOutcome {
        if self.in_flight != Some(InFlight::Swap(ticket.request_id)) {
            log::debug!("Discarding stale swap reply (request {})", ticket.request_id);
            return SubmitOutcome::Superseded;
        }
        self.set_in_flight(None);

        let mode = ticket.mode;
        let bytes = match reply {
            Ok(bytes) if bytes.is_empty() => {
                self.fail(SessionError::SwapFailed { mode, cause: Some("empty response".into()) });
                return SubmitOutcome::Failed;
            }
            Ok(bytes) => bytes,
            Err(err) => {
                self.fail(SessionError::SwapFailed { mode, cause: err.cause() });
                return SubmitOutcome::Failed;
            }
        };

        let url = self.platform.bytes_url(&bytes, mode.result_mime_type());
        log::info!("{} swap complete ({} bytes)", mode.label(), bytes.len());
        self.result = Some(SwapResult { kind: mode, bytes, url });
        self.emit(SessionEvent::ResultChanged(Some(mode)));
        SubmitOutcome::Completed
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        loop {
            match self.begin_submit() {
                SubmitStep::Aborted => return SubmitOutcome::Aborted,
                SubmitStep::Detect(ticket) => {
                    if !self.run_detection(ticket).await.can_proceed() {
                        return SubmitOutcome::Aborted;
                    }
                }
                SubmitStep::Swap(ticket) => {
                    let reply = self.platform.post_form(ticket.endpoint(), ticket.form()).await;
                    return self.finish_swap(ticket, reply);
                }
            }
        }
    }

    fn needs_face_selection(&self) -> bool {
        self.detection_applies() && self.faces.len() > 1 && self.selected_face.is_none()
    }

    fn next_request_id(&mut self) -> u64 {
        self.last_request_id += 1;
        self.last_request_id
    }

    fn release_all(&mut self) {
        self.source = None;
        self.target = None;
        self.clear_faces();
        self.clear_result();
        self.set_in_flight(None);
    }

    fn invalidate_swap(&mut self) {
        if let Some(InFlight::Swap(request_id)) = self.in_flight {
            log::debug!("Source changed, dropping swap request {}", request_id);
            self.set_in_flight(None);
        }
    }

    fn clear_faces(&mut self) {
        if !self.faces.is_empty() || self.selected_face.is_some() {
            self.faces.clear();
            self.selected_face = None;
            self.emit(SessionEvent::FacesChanged(0));
            self.emit(SessionEvent::SelectionChanged(None));
        }
    }

    fn clear_result(&mut self) {
        if self.result.take().is_some() {
            self.emit(SessionEvent::ResultChanged(None));
        }
    }

    fn set_in_flight(&mut self, in_flight: Option<InFlight>) {
        let was_loading = self.is_loading();
        self.in_flight = in_flight;
        if was_loading != self.is_loading() {
            self.emit(SessionEvent::LoadingChanged(self.is_loading()));
        }
    }

    fn set_error(&mut self, error: Option<String>) {
        if self.error != error {
            self.error = error.clone();
            self.emit(SessionEvent::ErrorChanged(error));
        }
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        log::warn!("{}", err);
        self.set_error(Some(err.to_string()));
        err
    }

    fn emit(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}
