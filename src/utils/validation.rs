//! URL and input validation utilities

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use url::Url;

use crate::core::models::{AppError, AppResult, DownloadJob, InputField};

fn resolution_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+p$").expect("static resolution pattern"))
}

/// Check if URL is a valid video URL
pub fn is_valid_video_url(url: &str) -> bool {
    if let Ok(parsed) = Url::parse(url) {
        let scheme = parsed.scheme();
        scheme == "http" || scheme == "https"
    } else {
        false
    }
}

/// Check a resolution label such as `720p`
pub fn is_valid_resolution(resolution: &str) -> bool {
    resolution_pattern().is_match(resolution)
}

/// Raw user input for one download, as typed into the command line
#[derive(Debug, Clone, Default)]
pub struct JobRequest {
    pub url: String,
    pub output_directory: String,
    pub resolution: String,
    pub audio_only: bool,
}

impl JobRequest {
    /// Validate the inputs and build a job.
    ///
    /// Every invalid field is reported at once so the caller can flag all of
    /// them. Nothing touches the network or the filesystem here.
    pub fn validate(&self) -> AppResult<DownloadJob> {
        let url = self.url.trim();
        let output_directory = self.output_directory.trim();
        let resolution = self.resolution.trim();

        let mut fields = Vec::new();
        let mut problems = Vec::new();

        if url.is_empty() {
            fields.push(InputField::Url);
            problems.push("url is required".to_string());
        } else if !is_valid_video_url(url) {
            fields.push(InputField::Url);
            problems.push(format!("'{url}' is not an http(s) URL"));
        }

        if output_directory.is_empty() {
            fields.push(InputField::OutputDirectory);
            problems.push("output directory is required".to_string());
        }

        if !self.audio_only && !is_valid_resolution(resolution) {
            fields.push(InputField::Resolution);
            problems.push(format!(
                "resolution '{resolution}' must look like 720p"
            ));
        }

        if !fields.is_empty() {
            return Err(AppError::Validation {
                fields,
                message: problems.join("; "),
            });
        }

        Ok(DownloadJob::new(
            url,
            resolution,
            PathBuf::from(output_directory),
            self.audio_only,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, out: &str, res: &str, audio_only: bool) -> JobRequest {
        JobRequest {
            url: url.to_string(),
            output_directory: out.to_string(),
            resolution: res.to_string(),
            audio_only,
        }
    }

    fn invalid_fields(result: AppResult<DownloadJob>) -> Vec<InputField> {
        match result {
            Err(AppError::Validation { fields, .. }) => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_builds_job() {
        let job = request("https://youtu.be/abc", " /tmp/out ", "720p", false)
            .validate()
            .unwrap();
        assert_eq!(job.source_url, "https://youtu.be/abc");
        assert_eq!(job.output_directory, PathBuf::from("/tmp/out"));
        assert_eq!(job.requested_resolution, "720p");
        assert!(!job.audio_only);
    }

    #[test]
    fn test_missing_url_and_path_are_both_reported() {
        let fields = invalid_fields(request("", "  ", "720p", false).validate());
        assert_eq!(fields, vec![InputField::Url, InputField::OutputDirectory]);
    }

    #[test]
    fn test_missing_path_only() {
        let fields = invalid_fields(request("https://youtu.be/abc", "", "720p", false).validate());
        assert_eq!(fields, vec![InputField::OutputDirectory]);
    }

    #[test]
    fn test_resolution_only_checked_for_video_jobs() {
        let fields = invalid_fields(request("https://youtu.be/abc", "/o", "", false).validate());
        assert_eq!(fields, vec![InputField::Resolution]);

        assert!(request("https://youtu.be/abc", "/o", "", true).validate().is_ok());
    }

    #[test]
    fn test_url_scheme() {
        assert!(is_valid_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_video_url("http://youtube.com/watch?v=test123"));
        assert!(!is_valid_video_url("ftp://example.com/video"));
        assert!(!is_valid_video_url("not_a_url"));
    }

    #[test]
    fn test_resolution_labels() {
        for ok in ["144p", "720p", "1080p", "2160p", "7680p"] {
            assert!(is_valid_resolution(ok), "{ok}");
        }
        for bad in ["", "720", "p", "720p60", "hd", " 720p"] {
            assert!(!is_valid_resolution(bad), "{bad}");
        }
    }
}
