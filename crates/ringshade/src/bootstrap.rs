use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ringconfig::RingConfig;
use tracing::{debug, info};

use crate::paths::AppPaths;

/// Configuration picked for this run and the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: RingConfig,
    pub source: Option<PathBuf>,
}

pub fn bootstrap_filesystem(paths: &AppPaths) -> Result<()> {
    for dir in [paths.config_dir(), paths.data_dir()] {
        ensure_directory(dir)?;
    }
    Ok(())
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if path.is_dir() {
            debug!(path = %path.display(), "reusing existing directory");
            Ok(())
        } else {
            bail!("filesystem entry at {} is not a directory", path.display());
        }
    } else {
        fs::create_dir_all(path).with_context(|| {
            format!("failed to create ringshade directory at {}", path.display())
        })?;
        info!(path = %path.display(), "created ringshade directory");
        Ok(())
    }
}

/// Loads the explicit config file, else `ring.toml` in the config directory,
/// else the built-in defaults.
pub fn load_config(explicit: Option<&Path>, paths: &AppPaths) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        let config = RingConfig::load(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded explicit config file");
        return Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
        });
    }

    let default_path = paths.config_file();
    if default_path.exists() {
        let config = RingConfig::load(&default_path)
            .with_context(|| format!("failed to load config file {}", default_path.display()))?;
        debug!(path = %default_path.display(), "loaded user config file");
        return Ok(LoadedConfig {
            config,
            source: Some(default_path),
        });
    }

    debug!("no config file found; using built-in defaults");
    Ok(LoadedConfig {
        config: RingConfig::default(),
        source: None,
    })
}
