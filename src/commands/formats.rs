//! `ytd formats`: list the streams a URL offers

use clap::Args;
use std::fmt::Write as _;

use crate::core::catalog::CatalogClient;
use crate::core::config::AppConfig;
use crate::core::models::{AppError, AppResult, InputField, StreamCatalog};
use crate::utils::validation::is_valid_video_url;

#[derive(Args, Debug)]
pub struct FormatsArgs {
    /// Video page URL
    #[arg(long)]
    pub url: String,
}

pub async fn formats(args: FormatsArgs, config: &AppConfig) -> AppResult<()> {
    let url = args.url.trim();
    if !is_valid_video_url(url) {
        return Err(AppError::Validation {
            fields: vec![InputField::Url],
            message: format!("'{url}' is not an http(s) URL"),
        });
    }

    let client = crate::build_catalog_client(config)?;
    let catalog = client.fetch(url).await?;
    print!("{}", render_catalog(&catalog));
    Ok(())
}

/// Plain-text table of a catalog, one stream per line in catalog order
pub fn render_catalog(catalog: &StreamCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", catalog.title);
    let _ = writeln!(
        out,
        "{:<10} {:<12} {:<8} {:<10} {:>10}",
        "ID", "KIND", "RES", "CONTAINER", "KBPS"
    );
    for stream in &catalog.streams {
        let bitrate = stream
            .bitrate
            .map(|b| format!("{b:.0}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<10} {:<12} {:<8} {:<10} {:>10}",
            stream.format_id,
            stream.kind.to_string(),
            stream.resolution.as_deref().unwrap_or("-"),
            stream.container,
            bitrate
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{MediaKind, Stream};

    #[test]
    fn test_render_catalog() {
        let catalog = StreamCatalog {
            url: "https://youtu.be/abc".to_string(),
            title: "Demo".to_string(),
            streams: vec![
                Stream {
                    format_id: "137".to_string(),
                    mime_type: "video/mp4".to_string(),
                    container: "mp4".to_string(),
                    kind: MediaKind::VideoOnly,
                    resolution: Some("1080p".to_string()),
                    bitrate: Some(4400.4),
                    filesize: None,
                },
                Stream {
                    format_id: "140".to_string(),
                    mime_type: "audio/m4a".to_string(),
                    container: "m4a".to_string(),
                    kind: MediaKind::AudioOnly,
                    resolution: None,
                    bitrate: None,
                    filesize: None,
                },
            ],
        };

        let text = render_catalog(&catalog);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Demo");
        assert!(lines[2].starts_with("137"));
        assert!(lines[2].contains("video"));
        assert!(lines[2].contains("1080p"));
        assert!(lines[2].trim_end().ends_with("4400"));
        assert!(lines[3].contains("audio"));
        assert!(lines[3].trim_end().ends_with('-'));
    }
}
