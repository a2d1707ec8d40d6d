//! `ytd download`

use clap::Args;
use tracing::{info, warn};

use crate::core::config::{AppConfig, KNOWN_RESOLUTIONS};
use crate::core::models::{AppResult, DownloadJob, JobOutcome};
use crate::core::pipeline::DownloadPipeline;
use crate::core::runtime::{spawn_job_runtime, JobRuntimeHandle};
use crate::utils::validation::JobRequest;

#[derive(Args, Debug, Default)]
pub struct DownloadArgs {
    /// Video page URL
    #[arg(long)]
    pub url: Option<String>,

    /// Target resolution such as 720p (defaults to the configured one)
    #[arg(long)]
    pub resolution: Option<String>,

    /// Directory for the final file; created if missing
    #[arg(long)]
    pub out: Option<String>,

    /// Download only the audio track
    #[arg(long)]
    pub audio_only: bool,
}

impl DownloadArgs {
    pub fn to_request(&self, config: &AppConfig) -> JobRequest {
        JobRequest {
            url: self.url.clone().unwrap_or_default(),
            output_directory: self.out.clone().unwrap_or_default(),
            resolution: self
                .resolution
                .clone()
                .unwrap_or_else(|| config.download.default_resolution.clone()),
            audio_only: self.audio_only,
        }
    }
}

/// Validate the inputs, then run the job on a background runtime
pub async fn download(args: DownloadArgs, config: &AppConfig) -> AppResult<JobOutcome> {
    let job = args.to_request(config).validate()?;

    if !job.audio_only && !KNOWN_RESOLUTIONS.contains(&job.requested_resolution.as_str()) {
        warn!(
            "Resolution {} is not one of {:?}; the closest label by first digit may be used",
            job.requested_resolution, KNOWN_RESOLUTIONS
        );
    }

    let pipeline = crate::build_pipeline(config)?;
    run_job(pipeline, job).await
}

/// Submit `job` and wait for it, cancelling on Ctrl-C
pub async fn run_job(pipeline: DownloadPipeline, job: DownloadJob) -> AppResult<JobOutcome> {
    let runtime = spawn_job_runtime(pipeline)?;
    submit_with_interrupt(&runtime, job).await
}

async fn submit_with_interrupt(
    runtime: &JobRuntimeHandle,
    job: DownloadJob,
) -> AppResult<JobOutcome> {
    let job_id = job.id;
    let submission = runtime.submit(job);
    tokio::pin!(submission);

    tokio::select! {
        result = &mut submission => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received; job stops after the current step");
            runtime.cancel(job_id);
            submission.await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{AppError, InputField};

    #[test]
    fn test_request_uses_configured_resolution() {
        let mut config = AppConfig::default();
        config.download.default_resolution = "1080p".to_string();
        let args = DownloadArgs {
            url: Some("https://youtu.be/abc".to_string()),
            out: Some("/tmp/o".to_string()),
            ..DownloadArgs::default()
        };

        let request = args.to_request(&config);
        assert_eq!(request.resolution, "1080p");
        assert_eq!(request.output_directory, "/tmp/o");
    }

    #[tokio::test]
    async fn test_validation_fails_before_tool_lookup() {
        let mut config = AppConfig::default();
        // a tool lookup would fail with a Config error
        config.tools.ytdlp_path = Some("/definitely/not/here/yt-dlp".into());

        let err = download(DownloadArgs::default(), &config).await.unwrap_err();
        match err {
            AppError::Validation { fields, .. } => {
                assert_eq!(fields, vec![InputField::Url, InputField::OutputDirectory]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
