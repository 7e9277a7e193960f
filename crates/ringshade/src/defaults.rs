use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ringconfig::RingConfig;
use tracing::{debug, info};

use crate::paths::AppPaths;

#[derive(Debug, Clone)]
pub struct InitReport {
    pub path: PathBuf,
    pub written: bool,
    pub replaced: bool,
}

/// Writes the built-in `ring.toml` into the config directory.
///
/// An existing file is left alone unless `force` is set, so user edits survive
/// repeated runs.
pub fn init_default_config(paths: &AppPaths, force: bool) -> Result<InitReport> {
    let path = paths.config_file();
    let existed = path.exists();
    if existed && !force {
        debug!(path = %path.display(), "config file already present; leaving it untouched");
        return Ok(InitReport {
            path,
            written: false,
            replaced: false,
        });
    }

    fs::create_dir_all(paths.config_dir()).with_context(|| {
        format!(
            "failed to prepare config directory {}",
            paths.config_dir().display()
        )
    })?;
    let contents = RingConfig::default()
        .to_toml_string()
        .context("failed to serialise default config")?;
    fs::write(&path, contents)
        .with_context(|| format!("failed to write default config to {}", path.display()))?;
    info!(path = %path.display(), replaced = existed, "wrote default config file");

    Ok(InitReport {
        path,
        written: true,
        replaced: existed,
    })
}

#[derive(Debug, Clone)]
pub struct PathOverview {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
    pub config_present: bool,
    pub default_output: PathBuf,
    pub default_sequence_dir: PathBuf,
}

pub fn describe_paths(paths: &AppPaths) -> PathOverview {
    let config_file = paths.config_file();
    PathOverview {
        config_dir: paths.config_dir().to_path_buf(),
        data_dir: paths.data_dir().to_path_buf(),
        config_present: config_file.exists(),
        config_file,
        default_output: paths.default_output(),
        default_sequence_dir: paths.default_sequence_dir(),
    }
}
