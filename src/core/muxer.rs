//! Muxing a video-only and an audio-only file into one container

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info};

use crate::core::catalog::last_stderr_line;
use crate::core::models::{AppError, AppResult};

/// Combines separately downloaded tracks into `output`
#[async_trait]
pub trait Muxer: Send + Sync {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> AppResult<()>;
}

/// `ffmpeg` subprocess muxer: video stream copied, audio re-encoded
#[derive(Debug, Clone)]
pub struct FfmpegMuxer {
    binary: PathBuf,
    audio_codec: String,
}

impl FfmpegMuxer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            audio_codec: "aac".to_string(),
        }
    }

    pub fn with_audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.audio_codec = codec.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Arguments passed to ffmpeg, overwriting `output` if present
    pub fn build_args(&self, video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into()];
        args.push(video.into());
        args.push("-i".into());
        args.push(audio.into());
        args.extend(
            [
                "-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(self.audio_codec.as_str().into());
        args.push("-strict".into());
        args.push("experimental".into());
        args.push(output.into());
        args
    }
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> AppResult<()> {
        for input in [video, audio] {
            if !input.is_file() {
                return Err(AppError::Mux(format!(
                    "input file not found: {}",
                    input.display()
                )));
            }
        }

        info!(
            "🎬 Merging {} + {} -> {}",
            video.display(),
            audio.display(),
            output.display()
        );

        let result = Command::new(&self.binary)
            .args(self.build_args(video, audio, output))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::Mux(format!("Failed to execute ffmpeg: {e}")))?;

        if !result.status.success() {
            let reason = last_stderr_line(&result.stderr);
            error!("❌ Error occurred while merging: {}", reason);
            return Err(AppError::Mux(reason));
        }

        info!("✅ Merge completed, output saved at: {}", output.display());
        Ok(())
    }
}
