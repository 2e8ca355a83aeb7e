use clap::{Args, Parser, Subcommand};
use shared::Mode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "faceswap", version, about = "Swap faces in images and videos using the FaceSwap services")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML config with limits, endpoints and field names
    #[arg(long, global = true, env = "FACESWAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 300)]
    pub timeout: u64,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect faces in a target and save a thumbnail of each
    Detect(DetectArgs),
    /// Swap the face from a source image into a target image or video
    Swap(SwapArgs),
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    #[arg(long)]
    pub target: PathBuf,

    #[arg(long, default_value = "image")]
    pub mode: Mode,

    /// Directory for the face_<n>.jpg thumbnails
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct SwapArgs {
    #[arg(long, default_value = "image")]
    pub mode: Mode,

    #[arg(long)]
    pub source: PathBuf,

    #[arg(long)]
    pub target: PathBuf,

    /// Face to replace, numbered as `detect` labels them
    #[arg(long)]
    pub face: Option<usize>,

    /// Where to write the result [default: faceswap_result.jpg or .mp4]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_swap() {
        let cli = Cli::parse_from([
            "faceswap", "-vv", "swap", "--mode", "video", "--source", "me.jpg", "--target",
            "clip.mp4", "--face", "2",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Swap(args) = cli.command else {
            panic!("expected swap");
        };
        assert_eq!(args.mode, Mode::Video);
        assert_eq!(args.face, Some(2));
        assert!(args.output.is_none());
    }
}
