use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::errors::TinybenchError;
use crate::types::{DEFAULT_START_MARKER, DEFAULT_STOP_MARKER, Markers};

pub const DEFAULT_WINDOW_SECS: f64 = 10.0;
pub const DEFAULT_RUNTIME: &str = "node";
pub const DEFAULT_EVAL_FLAG: &str = "-e";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Sampling window per fragment, in seconds.
    pub window: Option<f64>,
    pub runtime: Option<String>,
    pub eval_flag: Option<String>,
    pub start_marker: Option<String>,
    pub stop_marker: Option<String>,
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub window: Option<f64>,
    pub runtime: Option<String>,
    pub eval_flag: Option<String>,
}

/// Fully resolved settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub window: Duration,
    pub runtime: String,
    pub eval_flag: String,
    pub markers: Markers,
}

/// `~/.config/tinybench/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tinybench").join("config.toml"))
}

/// Load the config file. An explicit `path` must exist; the default
/// location is optional.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(FileConfig::default()),
        },
    };

    if !required && !path.is_file() {
        return Ok(FileConfig::default());
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| TinybenchError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    let config = parse_file_config(&raw).map_err(|detail| TinybenchError::ConfigParse {
        path: path.clone(),
        detail,
    })?;

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

fn parse_file_config(raw: &str) -> std::result::Result<FileConfig, String> {
    toml::from_str(raw).map_err(|e| e.message().to_string())
}

impl Settings {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let window_secs = overrides
            .window
            .or(file.window)
            .unwrap_or(DEFAULT_WINDOW_SECS);
        let window = parse_window(window_secs)?;

        Ok(Settings {
            window,
            runtime: overrides
                .runtime
                .or(file.runtime)
                .unwrap_or_else(|| DEFAULT_RUNTIME.to_string()),
            eval_flag: overrides
                .eval_flag
                .or(file.eval_flag)
                .unwrap_or_else(|| DEFAULT_EVAL_FLAG.to_string()),
            markers: Markers {
                start: file
                    .start_marker
                    .unwrap_or_else(|| DEFAULT_START_MARKER.to_string()),
                stop: file
                    .stop_marker
                    .unwrap_or_else(|| DEFAULT_STOP_MARKER.to_string()),
            },
        })
    }
}

fn parse_window(secs: f64) -> Result<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return Err(TinybenchError::InvalidWindow {
            value: secs.to_string(),
        }
        .into());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| {
        TinybenchError::InvalidWindow {
            value: secs.to_string(),
        }
        .into()
    })
}
