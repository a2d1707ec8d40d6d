//! Locating the external executables (`yt-dlp`, `ffmpeg`)

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::config::ToolsConfig;
use crate::core::models::{AppError, AppResult};

/// External tool the downloader shells out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    YtDlp,
    Ffmpeg,
}

impl Tool {
    pub fn program_name(self) -> &'static str {
        match self {
            Tool::YtDlp => "yt-dlp",
            Tool::Ffmpeg => "ffmpeg",
        }
    }

    fn file_name(self) -> String {
        if cfg!(target_os = "windows") {
            format!("{}.exe", self.program_name())
        } else {
            self.program_name().to_string()
        }
    }

    /// Location of a copy shipped alongside the application binary
    pub fn bundled_path(self, base_dir: &Path) -> PathBuf {
        match self {
            Tool::YtDlp => base_dir.join(self.file_name()),
            Tool::Ffmpeg => base_dir.join("ffmpeg").join("bin").join(self.file_name()),
        }
    }
}

/// Resolve `tool`: explicit config path, then a bundled copy next to the
/// running executable, then `PATH`.
pub fn resolve_tool(tool: Tool, config: &ToolsConfig) -> AppResult<PathBuf> {
    let configured = match tool {
        Tool::YtDlp => config.ytdlp_path.as_ref(),
        Tool::Ffmpeg => config.ffmpeg_path.as_ref(),
    };
    let base_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    resolve_tool_from(tool, configured.map(PathBuf::as_path), base_dir.as_deref())
}

pub(crate) fn resolve_tool_from(
    tool: Tool,
    configured: Option<&Path>,
    base_dir: Option<&Path>,
) -> AppResult<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            debug!("🔧 Using configured {}: {}", tool.program_name(), path.display());
            return Ok(path.to_path_buf());
        }
        return Err(AppError::Config(format!(
            "{} not found at configured path {}",
            tool.program_name(),
            path.display()
        )));
    }

    if let Some(base_dir) = base_dir {
        let bundled = tool.bundled_path(base_dir);
        if bundled.is_file() {
            debug!("🔧 Using bundled {}: {}", tool.program_name(), bundled.display());
            return Ok(bundled);
        }
    }

    which::which(tool.program_name()).map_err(|_| {
        AppError::Config(format!(
            "{} binary not found; install it or set its path in the configuration",
            tool.program_name()
        ))
    })
}
