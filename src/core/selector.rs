//! Picks the video and audio streams to mux for a requested resolution

use tracing::{debug, info};

use crate::core::models::{SelectionResult, Stream, StreamCatalog, StreamFilter};

/// Container required for the video half of a muxed download
pub const VIDEO_CONTAINER: &str = "mp4";

/// Select a video-only mp4 stream at `requested` and the first audio-only
/// stream of the catalog.
///
/// When no label equals `requested`, the first video-only mp4 stream whose
/// label starts with the same first character is used instead: `720p` may
/// resolve to any `7…` label and `1440p` to `1080p`. This is a plain prefix
/// check, not a nearest-resolution search.
pub fn select<'a>(catalog: &'a StreamCatalog, requested: &str) -> SelectionResult<'a> {
    let exact = catalog
        .filter(
            StreamFilter::video_only()
                .resolution(requested)
                .container(VIDEO_CONTAINER),
        )
        .into_iter()
        .next();

    let (video, fallback_used) = match exact {
        Some(stream) => (Some(stream), false),
        None => {
            let candidates = catalog.filter(StreamFilter::video_only().container(VIDEO_CONTAINER));
            let labels: Vec<&str> = candidates
                .iter()
                .filter_map(|s| s.resolution.as_deref())
                .collect();
            info!(
                "🔎 No {} stream at {}; available video streams: {:?}",
                VIDEO_CONTAINER, requested, labels
            );
            let fallback = leading_char_match(&candidates, requested);
            (fallback, fallback.is_some())
        }
    };

    let audio = catalog.first_audio();

    debug!(
        "Selected video={:?} audio={:?} fallback={}",
        video.map(|s| &s.format_id),
        audio.map(|s| &s.format_id),
        fallback_used
    );

    SelectionResult {
        video,
        audio,
        fallback_used,
    }
}

fn leading_char_match<'a>(candidates: &[&'a Stream], requested: &str) -> Option<&'a Stream> {
    let lead = requested.chars().next()?;
    candidates.iter().copied().find(|stream| {
        stream
            .resolution
            .as_deref()
            .is_some_and(|label| label.starts_with(lead))
    })
}
