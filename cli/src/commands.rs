use shared::{DetectOutcome, Platform, Session, SubmitOutcome, SwapConfig};
use std::path::{Path, PathBuf};

use crate::args::{DetectArgs, SwapArgs};
use crate::error::CliError;
use crate::http::HttpPlatform;
use crate::local_file::LocalFile;

/// Detects faces in the target and writes `face_<n>.jpg` for each one.
/// Returns the written paths in face order.
pub async fn detect(
    config: SwapConfig,
    platform: HttpPlatform,
    args: DetectArgs,
) -> Result<Vec<PathBuf>, CliError> {
    let mut session = Session::new(platform, config);
    session.set_mode(args.mode);

    let target = LocalFile::open(&args.target)?;
    match session.upload_target(Some(target)).await? {
        Some(DetectOutcome::Ready) | Some(DetectOutcome::SelectionRequired { .. }) => {}
        Some(DetectOutcome::Failed) => return Err(session_error(&session)),
        _ => {
            log::warn!("Face detection does not apply to {} targets", args.mode);
            return Ok(Vec::new());
        }
    }

    std::fs::create_dir_all(&args.out_dir).map_err(|source| CliError::WriteFile {
        path: args.out_dir.clone(),
        source,
    })?;
    let mut written = Vec::with_capacity(session.faces().len());
    for face in session.faces() {
        let path = args.out_dir.join(format!("face_{}.jpg", face.index + 1));
        write_file(&path, &face.thumbnail)?;
        log::info!("{} saved to {}", face.label(), path.display());
        written.push(path);
    }
    Ok(written)
}

/// Runs a full swap and writes the result. Returns the output path.
pub async fn swap(
    config: SwapConfig,
    platform: HttpPlatform,
    args: SwapArgs,
) -> Result<PathBuf, CliError> {
    let mut session = Session::new(platform, config);
    session.set_mode(args.mode);

    session.set_source(Some(LocalFile::open(&args.source)?))?;
    let target = LocalFile::open(&args.target)?;

    match session.upload_target(Some(target)).await? {
        Some(DetectOutcome::SelectionRequired { faces }) => match args.face {
            Some(face) if (1..=faces).contains(&face) => session.select_face(face - 1),
            Some(face) => {
                return Err(CliError::NoSuchFace { requested: face, available: faces });
            }
            None => return Err(CliError::FaceSelectionRequired { count: faces }),
        },
        Some(DetectOutcome::Ready) => {
            if let Some(face) = args.face.filter(|face| *face != 1) {
                return Err(CliError::NoSuchFace { requested: face, available: 1 });
            }
        }
        Some(DetectOutcome::Failed) => return Err(session_error(&session)),
        _ => {
            if args.face.is_some() {
                log::warn!("--face is ignored for {} targets", args.mode);
            }
        }
    }

    match session.submit().await {
        SubmitOutcome::Completed => {}
        _ => return Err(session_error(&session)),
    }
    let Some(result) = session.result() else {
        return Err(session_error(&session));
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(result.file_name()));
    write_file(&output, result.bytes())?;
    log::info!("Swapped {} saved to {}", result.kind(), output.display());
    Ok(output)
}

fn session_error<P: Platform>(session: &Session<P>) -> CliError {
    CliError::Session(session.error().unwrap_or("Face swap did not complete.").to_string())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, bytes).map_err(|source| CliError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
