//! `ytd config`

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::core::config::AppConfig;
use crate::core::models::{AppError, AppResult};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,
    /// Print the configuration file location
    Path,
    /// Overwrite the configuration file with defaults
    Reset,
}

fn config_error(err: anyhow::Error) -> AppError {
    AppError::Config(format!("{err:#}"))
}

fn resolve_path(explicit: Option<&Path>) -> AppResult<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => AppConfig::get_config_path().map_err(config_error),
    }
}

pub fn config(action: ConfigAction, explicit: Option<&Path>, current: &AppConfig) -> AppResult<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", current.export().map_err(config_error)?);
        }
        ConfigAction::Path => {
            println!("{}", resolve_path(explicit)?.display());
        }
        ConfigAction::Reset => {
            let path = resolve_path(explicit)?;
            AppConfig::reset(&path).map_err(config_error)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
