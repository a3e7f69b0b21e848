pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::{BarLength, SugarConfig, ThemeConfig};

use crate::error::SugarError;

/// File name looked up in the working directory.
pub const PROJECT_CONFIG: &str = "sugar.toml";
/// File name looked up in the user's home directory.
pub const HOME_CONFIG: &str = ".sugar.toml";

/// Load configuration from the given path, or discover it.
///
/// An explicit path that does not exist is an error. When discovering, a
/// missing file is not an error: defaults are returned.
pub fn load(path: Option<&Path>) -> Result<SugarConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SugarError::Config(format!(
                    "config file not found: {}",
                    p.display()
                ))
                .into());
            }
            Some(p.to_path_buf())
        }
        None => discover_config(),
    };

    let Some(config_path) = config_path else {
        tracing::debug!("no sugar config found, using defaults");
        return Ok(SugarConfig::default());
    };

    tracing::debug!("loading sugar config from {}", config_path.display());
    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let config: SugarConfig = toml::from_str(&contents)
        .map_err(SugarError::from)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(config)
}

/// First existing candidate among `$SUGAR_CONFIG`, `./sugar.toml` and
/// `~/.sugar.toml`.
pub fn discover_config() -> Option<PathBuf> {
    let env_path = std::env::var("SUGAR_CONFIG").ok().map(PathBuf::from);
    let project = std::env::current_dir()
        .ok()
        .map(|d| d.join(PROJECT_CONFIG));
    let home = dirs::home_dir().map(|d| d.join(HOME_CONFIG));

    [env_path, project, home]
        .into_iter()
        .flatten()
        .find(|candidate| candidate.is_file())
}

/// Effective progress bar length from `[sugar] progressbar_length`.
pub fn bar_length(config: &SugarConfig) -> Result<BarLength, SugarError> {
    match &config.sugar.progressbar_length {
        Some(raw) => BarLength::try_from(raw),
        None => Ok(BarLength::default()),
    }
}
