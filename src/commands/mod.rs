//! Command handlers
//!
//! Each subcommand of the `ytd` binary maps to one handler here. Handlers
//! return typed results; `main` turns errors into exit codes.

pub mod config;
pub mod download;
pub mod formats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::AppConfig;
use crate::core::models::AppResult;

pub use config::ConfigAction;
pub use download::DownloadArgs;
pub use formats::FormatsArgs;

#[derive(Parser, Debug)]
#[command(name = "ytd", author, version, about = "Download a video at a chosen resolution, or just its audio")]
pub struct Cli {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a video (merged with its audio) or an audio-only track
    Download(DownloadArgs),
    /// List the streams available for a URL
    Formats(FormatsArgs),
    /// Inspect or reset the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Run the parsed command line
pub async fn dispatch(cli: Cli, config: &AppConfig) -> AppResult<()> {
    match cli.command {
        Command::Download(args) => {
            let outcome = download::download(args, config).await?;
            println!("{}", outcome.output_path.display());
            Ok(())
        }
        Command::Formats(args) => formats::formats(args, config).await,
        Command::Config { action } => config::config(action, cli.config.as_deref(), config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_download_command() {
        let cli = Cli::try_parse_from([
            "ytd",
            "download",
            "--url",
            "https://youtu.be/abc",
            "--resolution",
            "1080p",
            "--out",
            "/tmp/out",
            "--audio-only",
        ])
        .unwrap();

        match cli.command {
            Command::Download(args) => {
                assert_eq!(args.url.as_deref(), Some("https://youtu.be/abc"));
                assert_eq!(args.resolution.as_deref(), Some("1080p"));
                assert_eq!(args.out.as_deref(), Some("/tmp/out"));
                assert!(args.audio_only);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_missing_inputs_reach_validation() {
        // url and out are checked by validation, not by the parser
        let cli = Cli::try_parse_from(["ytd", "download"]).unwrap();
        assert!(matches!(cli.command, Command::Download(_)));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["ytd", "config", "path", "--config", "/tmp/c.json", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
    }
}
