//! Core data models for the downloader

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Media carried by a single stream
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    /// Video track without audio
    VideoOnly,
    /// Audio track without video
    AudioOnly,
    /// Audio and video muxed together by the site
    Progressive,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MediaKind::VideoOnly => "video",
            MediaKind::AudioOnly => "audio",
            MediaKind::Progressive => "progressive",
        };
        f.write_str(label)
    }
}

/// One rendition offered by the remote catalog

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]

pub struct Stream {
    pub format_id: String,

    pub mime_type: String,

    pub container: String,

    pub kind: MediaKind,

    /// Resolution label such as `720p`; only set for streams carrying video
    pub resolution: Option<String>,

    /// Approximate bitrate in kbps
    pub bitrate: Option<f64>,

    pub filesize: Option<u64>,
}

impl Stream {
    pub fn is_video_only(&self) -> bool {
        self.kind == MediaKind::VideoOnly
    }

    pub fn is_audio_only(&self) -> bool {
        self.kind == MediaKind::AudioOnly
    }
}

/// Query over a [`StreamCatalog`]; unset fields match anything
#[derive(Debug, Clone, Default)]
pub struct StreamFilter<'a> {
    pub kind: Option<MediaKind>,
    pub resolution: Option<&'a str>,
    pub container: Option<&'a str>,
}

impl<'a> StreamFilter<'a> {
    pub fn video_only() -> Self {
        Self {
            kind: Some(MediaKind::VideoOnly),
            ..Self::default()
        }
    }

    pub fn audio_only() -> Self {
        Self {
            kind: Some(MediaKind::AudioOnly),
            ..Self::default()
        }
    }

    pub fn resolution(mut self, resolution: &'a str) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn container(mut self, container: &'a str) -> Self {
        self.container = Some(container);
        self
    }

    fn matches(&self, stream: &Stream) -> bool {
        if let Some(kind) = self.kind {
            if stream.kind != kind {
                return false;
            }
        }
        if let Some(resolution) = self.resolution {
            if stream.resolution.as_deref() != Some(resolution) {
                return false;
            }
        }
        if let Some(container) = self.container {
            if stream.container != container {
                return false;
            }
        }
        true
    }
}

/// Snapshot of every stream available for one URL at fetch time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamCatalog {
    pub url: String,
    pub title: String,
    pub streams: Vec<Stream>,
}

impl StreamCatalog {
    /// Streams matching `filter`, in catalog order
    pub fn filter(&self, filter: StreamFilter<'_>) -> Vec<&Stream> {
        self.streams.iter().filter(|s| filter.matches(s)).collect()
    }

    pub fn first_audio(&self) -> Option<&Stream> {
        self.streams.iter().find(|s| s.is_audio_only())
    }
}

/// Streams chosen for a requested resolution
#[derive(Debug, Clone, Copy)]
pub struct SelectionResult<'a> {
    pub video: Option<&'a Stream>,
    pub audio: Option<&'a Stream>,
    /// The video stream came from the leading-character fallback
    pub fallback_used: bool,
}

impl<'a> SelectionResult<'a> {
    pub fn pair(&self) -> Option<(&'a Stream, &'a Stream)> {
        match (self.video, self.audio) {
            (Some(video), Some(audio)) => Some((video, audio)),
            _ => None,
        }
    }
}

/// A single user-requested download

#[derive(Debug, Clone, Serialize, Deserialize)]

pub struct DownloadJob {
    pub id: Uuid,

    pub source_url: String,

    pub requested_resolution: String,

    pub output_directory: PathBuf,

    pub audio_only: bool,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl DownloadJob {
    pub fn new(
        source_url: impl Into<String>,
        requested_resolution: impl Into<String>,
        output_directory: impl Into<PathBuf>,
        audio_only: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_url: source_url.into(),
            requested_resolution: requested_resolution.into(),
            output_directory: output_directory.into(),
            audio_only,
            created_at: chrono::Utc::now(),
        }
    }

    /// Short job tag used in temp file names and log lines
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    pub fn temp_artifacts(&self) -> TempArtifacts {
        TempArtifacts::for_job(&self.output_directory, &self.short_id())
    }
}

/// Intermediate files owned by one video job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempArtifacts {
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
}

impl TempArtifacts {
    pub fn for_job(output_directory: &Path, tag: &str) -> Self {
        Self {
            video_path: output_directory.join(format!("video-{tag}.mp4")),
            audio_path: output_directory.join(format!("audio-{tag}.mp4")),
        }
    }
}

/// How the final file was produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputMode {
    Merged,
    AudioOnly,
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub job_id: Uuid,
    pub output_path: PathBuf,
    pub mode: OutputMode,
    pub video_resolution: Option<String>,
    pub fallback_used: bool,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

/// User inputs checked before a job starts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputField {
    Url,
    OutputDirectory,
    Resolution,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InputField::Url => "url",
            InputField::OutputDirectory => "output directory",
            InputField::Resolution => "resolution",
        };
        f.write_str(label)
    }
}

/// Application error types

#[derive(Debug, thiserror::Error)]

pub enum AppError {
    #[error("Validation error: {message}")]
    Validation {
        fields: Vec<InputField>,
        message: String,
    },

    #[error("Catalog fetch error: {0}")]
    CatalogFetch(String),

    #[error("Stream not found: {0}")]
    StreamNotFound(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Mux error: {0}")]
    Mux(String),

    #[error("Job cancelled: {0}")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("System error: {0}")]
    System(String),
}

impl AppError {
    /// Process exit code reported by the command line for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation { .. } => 2,
            AppError::CatalogFetch(_) => 3,
            AppError::StreamNotFound(_) => 4,
            AppError::Download(_) => 5,
            AppError::Mux(_) => 6,
            AppError::Config(_) => 7,
            AppError::Cancelled(_) => 130,
            AppError::Io(_) | AppError::System(_) => 1,
        }
    }
}

/// Result type alias for application operations

pub type AppResult<T> = Result<T, AppError>;
