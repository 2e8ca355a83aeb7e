use clap::Parser;
use faceswap_cli::args::{Cli, Command};
use faceswap_cli::commands;
use faceswap_cli::config::load_config;
use faceswap_cli::error::{CliError, exit_codes};
use faceswap_cli::http::HttpPlatform;
use std::time::Duration;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let platform = HttpPlatform::with_timeout(Duration::from_secs(cli.timeout))?;

    match cli.command {
        Command::Detect(args) => {
            let written = commands::detect(config, platform, args).await?;
            for (n, path) in written.iter().enumerate() {
                println!("Face {}: {}", n + 1, path.display());
            }
        }
        Command::Swap(args) => {
            let output = commands::swap(config, platform, args).await?;
            println!("{}", output.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}
