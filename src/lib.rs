//! ytd - Core Library
//!
//! Resolution-aware video downloading: fetches the stream catalog for a URL,
//! picks a video-only and an audio-only stream, downloads both and muxes them
//! with ffmpeg. Audio-only downloads skip the merge.

pub mod commands;
pub mod core;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

// Re-export commonly used types
pub use crate::core::{
    catalog::{CatalogClient, YtDlpClient},
    config::AppConfig,
    models::{AppError, AppResult, DownloadJob, JobOutcome, StreamCatalog},
    muxer::{FfmpegMuxer, Muxer},
    pipeline::{CancelFlag, DownloadPipeline},
    runtime::{spawn_job_runtime, JobRuntimeHandle},
};

use crate::core::tools::{resolve_tool, Tool};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Catalog client backed by the configured or discovered yt-dlp
pub fn build_catalog_client(config: &AppConfig) -> AppResult<YtDlpClient> {
    let ytdlp = resolve_tool(Tool::YtDlp, &config.tools)?;
    Ok(YtDlpClient::new(
        ytdlp,
        Duration::from_secs(config.download.probe_timeout_seconds),
    ))
}

/// Pipeline wired to the yt-dlp client and the ffmpeg muxer
pub fn build_pipeline(config: &AppConfig) -> AppResult<DownloadPipeline> {
    let client = build_catalog_client(config)?;
    let ffmpeg = resolve_tool(Tool::Ffmpeg, &config.tools)?;
    let muxer = FfmpegMuxer::new(ffmpeg).with_audio_codec(config.tools.audio_codec.clone());

    tracing::debug!(
        "🔧 Pipeline tools: yt-dlp={} ffmpeg={}",
        client.binary().display(),
        muxer.binary().display()
    );
    Ok(DownloadPipeline::new(Arc::new(client), Arc::new(muxer)))
}

/// Initialize logging with the configured level
pub fn init(config: &AppConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.advanced.log_level.as_str()
    };
    utils::logging::init_tracing(Some(level));
    tracing::debug!("📚 {} v{} initialized", NAME, VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "ytd");
    }

    #[test]
    fn test_missing_configured_tool_fails_pipeline_build() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.tools.ytdlp_path = Some(dir.path().join("missing-yt-dlp"));

        let err = build_pipeline(&config).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }
}
