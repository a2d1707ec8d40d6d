//! Stream catalog client
//!
//! Fetches the list of renditions offered for a URL and downloads a single
//! rendition to disk. The production client drives the `yt-dlp` executable:
//! `-J` for the catalog, `-f <format_id>` for the transfer.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::models::{AppError, AppResult, MediaKind, Stream, StreamCatalog};

/// Remote stream catalog collaborator
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch an immutable catalog snapshot for `url`
    async fn fetch(&self, url: &str) -> AppResult<StreamCatalog>;

    /// Download `stream` of `catalog` to exactly `destination`
    async fn download(
        &self,
        catalog: &StreamCatalog,
        stream: &Stream,
        destination: &Path,
    ) -> AppResult<PathBuf>;
}

#[derive(Debug, Deserialize)]
struct YtdlpProbePayload {
    title: Option<String>,
    webpage_url: Option<String>,
    formats: Option<Vec<YtdlpFormat>>,
}

#[derive(Debug, Deserialize)]
struct YtdlpFormat {
    format_id: Option<String>,
    ext: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    tbr: Option<f64>,
    abr: Option<f64>,
    vbr: Option<f64>,
    filesize: Option<f64>,
    filesize_approx: Option<f64>,
}

impl YtdlpFormat {
    fn into_stream(self) -> Option<Stream> {
        let format_id = self.format_id?.trim().to_string();
        if format_id.is_empty() {
            return None;
        }

        let video_hint = self.width.is_some() || self.height.is_some() || self.vbr.is_some();
        let kind = match (self.vcodec.as_deref(), self.acodec.as_deref()) {
            // storyboards and other image tracks
            (Some("none"), Some("none")) => return None,
            (Some("none"), _) => MediaKind::AudioOnly,
            (Some(_), Some("none")) | (None, Some("none")) => MediaKind::VideoOnly,
            (Some(_), _) => MediaKind::Progressive,
            (None, Some(_)) if video_hint => MediaKind::Progressive,
            (None, Some(_)) => MediaKind::AudioOnly,
            // generic and HLS extractors often report no codecs for muxed video
            (None, None) if self.abr.is_some() && !video_hint => MediaKind::AudioOnly,
            (None, None) => MediaKind::Progressive,
        };

        let container = self.ext.unwrap_or_else(|| "unknown".to_string());
        let mime_type = match kind {
            MediaKind::AudioOnly => format!("audio/{container}"),
            _ => format!("video/{container}"),
        };
        let resolution = match kind {
            MediaKind::AudioOnly => None,
            _ => quality_label(self.width, self.height),
        };
        let bitrate = match kind {
            MediaKind::AudioOnly => self.abr.or(self.tbr),
            MediaKind::VideoOnly => self.vbr.or(self.tbr),
            MediaKind::Progressive => self.tbr,
        };

        Some(Stream {
            format_id,
            mime_type,
            container,
            kind,
            resolution,
            bitrate,
            filesize: self
                .filesize
                .or(self.filesize_approx)
                .map(|size| size.max(0.0) as u64),
        })
    }
}

/// `<n>p` label from the shorter frame side, so portrait renditions are
/// labelled like their landscape counterparts (720x1280 is `720p`)
fn quality_label(width: Option<u32>, height: Option<u32>) -> Option<String> {
    let lines = match (width, height) {
        (Some(w), Some(h)) => w.min(h),
        (_, Some(h)) => h,
        _ => return None,
    };
    Some(format!("{lines}p"))
}

/// Build a catalog from `yt-dlp -J` output.
///
/// yt-dlp lists formats worst to best; the catalog keeps the site's
/// best-first order so "first match" means the preferred rendition.
pub fn parse_catalog(url: &str, payload: &[u8]) -> AppResult<StreamCatalog> {
    let payload: YtdlpProbePayload = serde_json::from_slice(payload)
        .map_err(|e| AppError::CatalogFetch(format!("Failed to parse yt-dlp response: {e}")))?;

    let mut streams: Vec<Stream> = payload
        .formats
        .unwrap_or_default()
        .into_iter()
        .filter_map(YtdlpFormat::into_stream)
        .collect();
    streams.reverse();

    Ok(StreamCatalog {
        url: payload.webpage_url.unwrap_or_else(|| url.to_string()),
        title: payload.title.unwrap_or_else(|| "video".to_string()),
        streams,
    })
}

/// Last non-empty stderr line, the most useful bit of a tool failure
pub(crate) fn last_stderr_line(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no diagnostic output")
        .to_string()
}

/// yt-dlp treats `%` in `-o` as a template marker
fn escape_output_template(path: &Path) -> String {
    path.to_string_lossy().replace('%', "%%")
}

/// Catalog client backed by the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlpClient {
    binary: PathBuf,
    probe_timeout: Duration,
}

impl YtDlpClient {
    pub fn new(binary: impl Into<PathBuf>, probe_timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            probe_timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl CatalogClient for YtDlpClient {
    async fn fetch(&self, url: &str) -> AppResult<StreamCatalog> {
        debug!("🔍 Fetching stream catalog for URL: {}", url);

        let mut command = Command::new(&self.binary);
        command
            .arg("-J")
            .arg("--skip-download")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.probe_timeout, command.output())
            .await
            .map_err(|_| {
                AppError::CatalogFetch(format!(
                    "yt-dlp did not answer within {}s",
                    self.probe_timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::CatalogFetch(format!("Failed to execute yt-dlp: {e}")))?;

        if !output.status.success() {
            return Err(AppError::CatalogFetch(last_stderr_line(&output.stderr)));
        }

        let catalog = parse_catalog(url, &output.stdout)?;
        info!(
            "📋 Fetched catalog for '{}' with {} streams",
            catalog.title,
            catalog.streams.len()
        );
        Ok(catalog)
    }

    async fn download(
        &self,
        catalog: &StreamCatalog,
        stream: &Stream,
        destination: &Path,
    ) -> AppResult<PathBuf> {
        info!(
            "⬇️ Downloading {} stream {} -> {}",
            stream.kind,
            stream.format_id,
            destination.display()
        );

        let output = Command::new(&self.binary)
            .arg("-f")
            .arg(&stream.format_id)
            .arg("--no-playlist")
            .arg("--no-part")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("--force-overwrites")
            .arg("-o")
            .arg(escape_output_template(destination))
            .arg(&catalog.url)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::Download(format!("Failed to execute yt-dlp: {e}")))?;

        if !output.status.success() {
            return Err(AppError::Download(last_stderr_line(&output.stderr)));
        }

        if !destination.is_file() {
            return Err(AppError::Download(format!(
                "yt-dlp finished but {} was not written",
                destination.display()
            )));
        }

        Ok(destination.to_path_buf())
    }
}
