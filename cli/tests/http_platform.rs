use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{App, Error, HttpResponse, HttpServer, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use faceswap_cli::args::{DetectArgs, SwapArgs};
use faceswap_cli::commands;
use faceswap_cli::error::CliError;
use faceswap_cli::http::HttpPlatform;
use faceswap_cli::local_file::LocalFile;
use futures_util::{StreamExt, TryStreamExt};
use serde_json::json;
use shared::{DetectOutcome, Mode, Session, SubmitOutcome, SwapConfig};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Field {
    name: String,
    file_name: Option<String>,
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
struct Captured {
    path: &'static str,
    fields: Vec<Field>,
}

impl Captured {
    fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.field(name).map(|field| String::from_utf8_lossy(&field.data).into_owned())
    }
}

type Requests = Arc<Mutex<Vec<Captured>>>;

/// How the stub services answer.
#[derive(Clone)]
struct Script {
    faces: usize,
    detect_status: u16,
    swap_status: u16,
    swap_body: Vec<u8>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            faces: 1,
            detect_status: 200,
            swap_status: 200,
            swap_body: b"swapped".to_vec(),
        }
    }
}

async fn capture(path: &'static str, mut payload: Multipart, requests: &Requests) -> Result<(), Error> {
    let mut fields = Vec::new();
    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            data.extend_from_slice(&chunk?);
        }
        fields.push(Field { name, file_name, data });
    }
    requests.lock().unwrap().push(Captured { path, fields });
    Ok(())
}

async fn detect_faces(
    payload: Multipart,
    requests: web::Data<Requests>,
    script: web::Data<Script>,
) -> Result<HttpResponse, Error> {
    capture("detect", payload, &requests).await?;
    if script.detect_status != 200 {
        return Ok(HttpResponse::build(StatusCode::from_u16(script.detect_status).unwrap())
            .body("<html>Bad Gateway</html>"));
    }
    let faces: Vec<_> = (0..script.faces)
        .map(|n| json!({ "image_base64": STANDARD.encode(format!("face-{}", n)) }))
        .collect();
    Ok(HttpResponse::Ok().json(json!({ "faces": faces })))
}

async fn swap(
    path: &'static str,
    payload: Multipart,
    requests: &Requests,
    script: &Script,
) -> Result<HttpResponse, Error> {
    capture(path, payload, requests).await?;
    let status = StatusCode::from_u16(script.swap_status).unwrap();
    if status.is_success() {
        Ok(HttpResponse::Ok().content_type("image/jpeg").body(script.swap_body.clone()))
    } else {
        Ok(HttpResponse::build(status).json(json!({ "detail": "server overloaded" })))
    }
}

async fn swap_image(
    payload: Multipart,
    requests: web::Data<Requests>,
    script: web::Data<Script>,
) -> Result<HttpResponse, Error> {
    swap("swap-image", payload, &requests, &script).await
}

async fn swap_video(
    payload: Multipart,
    requests: web::Data<Requests>,
    script: web::Data<Script>,
) -> Result<HttpResponse, Error> {
    swap("swap-video", payload, &requests, &script).await
}

async fn start(script: Script) -> (SwapConfig, Requests) {
    let requests: Requests = Default::default();
    let requests_data = web::Data::new(requests.clone());
    let script = web::Data::new(script);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(requests_data.clone())
            .app_data(script.clone())
            .route("/detect-faces/", web::post().to(detect_faces))
            .route("/swap-faces/", web::post().to(swap_image))
            .route("/swap-faces-video/", web::post().to(swap_video))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let base = format!("http://{}", server.addrs()[0]);
    actix_web::rt::spawn(server.run());

    let mut config = SwapConfig::default();
    config.endpoints.detect_faces = format!("{}/detect-faces/", base);
    config.endpoints.swap_image = format!("{}/swap-faces/", base);
    config.endpoints.swap_video = format!("{}/swap-faces-video/", base);
    (config, requests)
}

fn image(name: &str, bytes: &[u8]) -> LocalFile {
    LocalFile::from_bytes(name, "image/png", bytes.to_vec())
}

#[actix_web::test]
async fn image_swap_sends_renamed_files_and_face_index() {
    let (config, requests) = start(Script::default()).await;
    let mut session = Session::new(HttpPlatform::default(), config);

    session.set_source(Some(image("me.png", b"src"))).unwrap();
    let outcome = session.upload_target(Some(image("group.png", b"tgt"))).await.unwrap();
    assert_eq!(outcome, Some(DetectOutcome::Ready));
    assert_eq!(session.selected_face(), Some(0));

    assert_eq!(session.submit().await, SubmitOutcome::Completed);
    assert_eq!(session.result().unwrap().bytes(), b"swapped");
    assert!(session.result().unwrap().url().starts_with("data:image/jpeg;base64,"));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let detect = &requests[0];
    assert_eq!(detect.path, "detect");
    assert_eq!(detect.field("target").unwrap().file_name.as_deref(), Some("target.jpg"));

    let swap = &requests[1];
    assert_eq!(swap.path, "swap-image");
    let source = swap.field("source").unwrap();
    assert_eq!(source.file_name.as_deref(), Some("source.jpg"));
    assert_eq!(source.data, b"src");
    assert_eq!(swap.field("target").unwrap().data, b"tgt");
    assert_eq!(swap.text("face_index").as_deref(), Some("0"));
}

#[actix_web::test]
async fn swap_error_detail_reaches_the_user() {
    let script = Script { swap_status: 500, ..Script::default() };
    let (config, _requests) = start(script).await;
    let mut session = Session::new(HttpPlatform::default(), config);

    session.set_source(Some(image("me.png", b"src"))).unwrap();
    session.upload_target(Some(image("group.png", b"tgt"))).await.unwrap();

    assert_eq!(session.submit().await, SubmitOutcome::Failed);
    assert_eq!(session.error(), Some("Failed to swap faces in image: server overloaded"));
    assert!(session.result().is_none());
    assert!(!session.is_loading());
}

#[actix_web::test]
async fn detection_without_json_detail_reports_status() {
    let script = Script { detect_status: 502, ..Script::default() };
    let (config, _requests) = start(script).await;
    let mut session = Session::new(HttpPlatform::default(), config);

    let outcome = session.upload_target(Some(image("group.png", b"tgt"))).await.unwrap();
    assert_eq!(outcome, Some(DetectOutcome::Failed));
    assert_eq!(session.error(), Some("Failed to detect faces: HTTP 502"));
    assert!(session.faces().is_empty());
}

#[actix_web::test]
async fn unreachable_service_is_a_detection_failure() {
    let mut config = SwapConfig::default();
    config.endpoints.detect_faces = "http://127.0.0.1:9/detect-faces/".to_string();
    let mut session = Session::new(HttpPlatform::default(), config);

    let outcome = session.upload_target(Some(image("group.png", b"tgt"))).await.unwrap();
    assert_eq!(outcome, Some(DetectOutcome::Failed));
    assert!(session.error().unwrap().starts_with("Failed to detect faces: "));
}

#[actix_web::test]
async fn video_swap_uses_video_endpoint_and_field_names() {
    let (mut config, requests) = start(Script::default()).await;
    config.fields.video_source = "source_image".to_string();
    config.fields.video_target = "target_video".to_string();
    let mut session = Session::new(HttpPlatform::default(), config);
    session.set_mode(Mode::Video);

    session.set_source(Some(image("me.jpg", b"src"))).unwrap();
    let clip = LocalFile::from_bytes("clip.webm", "video/webm", b"vid".to_vec());
    assert_eq!(session.upload_target(Some(clip)).await.unwrap(), None);

    assert_eq!(session.submit().await, SubmitOutcome::Completed);
    assert_eq!(session.result().unwrap().file_name(), "faceswap_result.mp4");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let swap = &requests[0];
    assert_eq!(swap.path, "swap-video");
    assert_eq!(swap.field("source_image").unwrap().file_name.as_deref(), Some("source.jpg"));
    let target = swap.field("target_video").unwrap();
    assert_eq!(target.file_name.as_deref(), Some("target.mp4"));
    assert_eq!(target.data, b"vid");
}

#[actix_web::test]
async fn detect_command_writes_thumbnails() {
    let script = Script { faces: 3, ..Script::default() };
    let (config, _requests) = start(script).await;
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("group.jpg");
    std::fs::write(&target, b"tgt").unwrap();

    let args = DetectArgs {
        target,
        mode: Mode::Image,
        out_dir: dir.path().join("faces"),
    };
    let written = commands::detect(config, HttpPlatform::default(), args).await.unwrap();

    assert_eq!(written.len(), 3);
    assert!(written[2].ends_with("face_3.jpg"));
    assert_eq!(std::fs::read(&written[1]).unwrap(), b"face-1");
}

#[actix_web::test]
async fn swap_command_maps_face_number_and_writes_output() {
    let script = Script { faces: 3, ..Script::default() };
    let (config, requests) = start(script).await;
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("me.png");
    let target = dir.path().join("group.jpg");
    std::fs::write(&source, b"src").unwrap();
    std::fs::write(&target, b"tgt").unwrap();
    let output = dir.path().join("out.jpg");

    let args = SwapArgs {
        mode: Mode::Image,
        source: source.clone(),
        target: target.clone(),
        face: Some(2),
        output: Some(output.clone()),
    };
    let written = commands::swap(config.clone(), HttpPlatform::default(), args).await.unwrap();
    assert_eq!(written, output);
    assert_eq!(std::fs::read(&output).unwrap(), b"swapped");
    let face_index = requests.lock().unwrap()[1].text("face_index");
    assert_eq!(face_index.as_deref(), Some("1"));

    let args = SwapArgs {
        mode: Mode::Image,
        source,
        target,
        face: None,
        output: Some(output),
    };
    let err = commands::swap(config, HttpPlatform::default(), args).await.unwrap_err();
    assert!(matches!(err, CliError::FaceSelectionRequired { count: 3 }));
}
