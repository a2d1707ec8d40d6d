//! In-memory stand-ins for the catalog client and muxer

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::catalog::CatalogClient;
use super::models::{AppError, AppResult, MediaKind, Stream, StreamCatalog};
use super::muxer::Muxer;
use super::pipeline::DownloadPipeline;

pub(crate) fn video(id: &str, res: &str) -> Stream {
    Stream {
        format_id: id.to_string(),
        mime_type: "video/mp4".to_string(),
        container: "mp4".to_string(),
        kind: MediaKind::VideoOnly,
        resolution: Some(res.to_string()),
        bitrate: None,
        filesize: None,
    }
}

pub(crate) fn audio(id: &str, container: &str) -> Stream {
    Stream {
        format_id: id.to_string(),
        mime_type: format!("audio/{container}"),
        container: container.to_string(),
        kind: MediaKind::AudioOnly,
        resolution: None,
        bitrate: Some(128.0),
        filesize: None,
    }
}

/// Catalog with video labels 1080p, 720p, 480p and one m4a audio stream
pub(crate) fn standard_catalog(title: &str) -> StreamCatalog {
    StreamCatalog {
        url: "https://www.youtube.com/watch?v=demo".to_string(),
        title: title.to_string(),
        streams: vec![
            video("v1080", "1080p"),
            video("v720", "720p"),
            video("v480", "480p"),
            audio("a140", "m4a"),
        ],
    }
}

#[derive(Default)]
pub(crate) struct FakeCatalogClient {
    catalog: Option<StreamCatalog>,
    fail_download_of: Option<String>,
    pub fetch_calls: AtomicUsize,
    pub downloads: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeCatalogClient {
    pub fn with_catalog(catalog: StreamCatalog) -> Self {
        Self {
            catalog: Some(catalog),
            ..Self::default()
        }
    }

    /// Every fetch fails as if the site were unreachable
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn failing_download(mut self, format_id: &str) -> Self {
        self.fail_download_of = Some(format_id.to_string());
        self
    }

    pub fn downloaded_ids(&self) -> Vec<String> {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalogClient {
    async fn fetch(&self, _url: &str) -> AppResult<StreamCatalog> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.catalog
            .clone()
            .ok_or_else(|| AppError::CatalogFetch("connection refused".to_string()))
    }

    async fn download(
        &self,
        _catalog: &StreamCatalog,
        stream: &Stream,
        destination: &Path,
    ) -> AppResult<PathBuf> {
        if self.fail_download_of.as_deref() == Some(stream.format_id.as_str()) {
            return Err(AppError::Download(format!(
                "HTTP Error 403 for {}",
                stream.format_id
            )));
        }
        tokio::fs::write(destination, stream.format_id.as_bytes()).await?;
        self.downloads
            .lock()
            .unwrap()
            .push((stream.format_id.clone(), destination.to_path_buf()));
        Ok(destination.to_path_buf())
    }
}

#[derive(Default)]
pub(crate) struct FakeMuxer {
    fail: bool,
    pub calls: AtomicUsize,
}

impl FakeMuxer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Muxer for FakeMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Mux("Invalid data found when processing input".to_string()));
        }
        let mut merged = tokio::fs::read(video).await?;
        merged.extend(tokio::fs::read(audio).await?);
        tokio::fs::write(output, merged).await?;
        Ok(())
    }
}

pub(crate) fn pipeline(
    client: &Arc<FakeCatalogClient>,
    muxer: &Arc<FakeMuxer>,
) -> DownloadPipeline {
    DownloadPipeline::new(client.clone(), muxer.clone())
}
