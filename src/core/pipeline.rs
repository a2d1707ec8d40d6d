//! Download-and-mux pipeline
//!
//! One [`DownloadJob`] runs as: catalog fetch → stream selection → video
//! download → audio download → mux → temp cleanup. Audio-only jobs stop after
//! a single download straight to the final file name.
//!
//! Temp files are only removed after a successful merge. Any failure leaves
//! what was already written on disk for inspection.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::catalog::CatalogClient;
use crate::core::models::{
    AppError, AppResult, DownloadJob, JobOutcome, OutputMode, StreamCatalog,
};
use crate::core::muxer::Muxer;
use crate::core::selector;
use crate::utils::file_utils::{ensure_dir_exists, output_file_path, remove_if_exists};

/// Cooperative cancellation flag shared between a job and its submitter
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self, stage: &str) -> AppResult<()> {
        if self.is_cancelled() {
            warn!("🛑 Job cancelled {}", stage);
            return Err(AppError::Cancelled(format!("cancelled {stage}")));
        }
        Ok(())
    }
}

/// Runs download jobs against a catalog client and a muxer
#[derive(Clone)]
pub struct DownloadPipeline {
    client: Arc<dyn CatalogClient>,
    muxer: Arc<dyn Muxer>,
}

impl DownloadPipeline {
    pub fn new(client: Arc<dyn CatalogClient>, muxer: Arc<dyn Muxer>) -> Self {
        Self { client, muxer }
    }

    /// Run `job` to completion, cancellation, or the first failure
    pub async fn run(&self, job: &DownloadJob, cancel: &CancelFlag) -> AppResult<JobOutcome> {
        let started_at = chrono::Utc::now();
        info!(
            "🚀 Job {} started: {} ({}) -> {}",
            job.short_id(),
            job.source_url,
            if job.audio_only {
                "audio only"
            } else {
                job.requested_resolution.as_str()
            },
            job.output_directory.display()
        );

        let result = match self.execute(job, cancel, started_at).await {
            // an interrupt also reaches the tool subprocess, failing the stage
            Err(e) if cancel.is_cancelled() && !matches!(e, AppError::Cancelled(_)) => {
                warn!("🛑 Job {} interrupted: {}", job.short_id(), e);
                Err(AppError::Cancelled(format!("interrupted: {e}")))
            }
            other => other,
        };
        match &result {
            Ok(outcome) => info!(
                "✅ Job {} completed: {}",
                job.short_id(),
                outcome.output_path.display()
            ),
            Err(e) => error!("❌ Job {} failed: {}", job.short_id(), e),
        }
        result
    }

    async fn execute(
        &self,
        job: &DownloadJob,
        cancel: &CancelFlag,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<JobOutcome> {
        cancel.check("before fetching the catalog")?;
        ensure_dir_exists(&job.output_directory)?;

        let catalog = self.client.fetch(&job.source_url).await?;

        if job.audio_only {
            self.download_audio(job, &catalog, cancel, started_at).await
        } else {
            self.download_and_merge(job, &catalog, cancel, started_at)
                .await
        }
    }

    async fn download_audio(
        &self,
        job: &DownloadJob,
        catalog: &StreamCatalog,
        cancel: &CancelFlag,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<JobOutcome> {
        let stream = catalog
            .first_audio()
            .ok_or_else(|| AppError::StreamNotFound("no audio stream available".to_string()))?;

        cancel.check("before downloading audio")?;
        info!("🎵 Downloading audio: {}", catalog.title);
        let destination = output_file_path(&job.output_directory, &catalog.title, &stream.container);
        let output_path = self.client.download(catalog, stream, &destination).await?;

        Ok(JobOutcome {
            job_id: job.id,
            output_path,
            mode: OutputMode::AudioOnly,
            video_resolution: None,
            fallback_used: false,
            started_at,
            finished_at: chrono::Utc::now(),
        })
    }

    async fn download_and_merge(
        &self,
        job: &DownloadJob,
        catalog: &StreamCatalog,
        cancel: &CancelFlag,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<JobOutcome> {
        let selection = selector::select(catalog, &job.requested_resolution);
        let (video, audio) = selection.pair().ok_or_else(|| {
            AppError::StreamNotFound(format!(
                "unable to find video or audio streams at {} resolution",
                job.requested_resolution
            ))
        })?;

        let temp = job.temp_artifacts();
        info!(
            "⬇️ Downloading video at {} and audio...",
            video.resolution.as_deref().unwrap_or("unknown")
        );

        cancel.check("before downloading video")?;
        self.client.download(catalog, video, &temp.video_path).await?;

        cancel.check("before downloading audio")?;
        self.client.download(catalog, audio, &temp.audio_path).await?;

        cancel.check("before merging")?;
        let output_path = output_file_path(&job.output_directory, &catalog.title, "mp4");
        if let Err(e) = self
            .muxer
            .mux(&temp.video_path, &temp.audio_path, &output_path)
            .await
        {
            warn!(
                "Keeping {} and {} after failed merge",
                temp.video_path.display(),
                temp.audio_path.display()
            );
            return Err(e);
        }

        remove_temp(&temp.video_path);
        remove_temp(&temp.audio_path);

        Ok(JobOutcome {
            job_id: job.id,
            output_path,
            mode: OutputMode::Merged,
            video_resolution: video.resolution.clone(),
            fallback_used: selection.fallback_used,
            started_at,
            finished_at: chrono::Utc::now(),
        })
    }
}

fn remove_temp(path: &Path) {
    if let Err(e) = remove_if_exists(path) {
        warn!("Failed to remove temporary file {}: {}", path.display(), e);
    }
}
