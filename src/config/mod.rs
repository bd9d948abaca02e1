use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use thiserror::Error;

use crate::color::{HueSpec, Luminosity, RandomColor, RandomSeed};
use crate::export::ExportSettings;
use crate::gradient::GradientSpan;
use crate::surface::{ImageKind, DEFAULT_JPEG_QUALITY};

const APP_DIR: &str = "cornerglow";
const APP_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub export: ExportConfig,
    pub random: RandomConfig,
    /// Where saved exports go; `$HOME/Pictures` when unset.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ImageKind,
    pub jpeg_quality: u8,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub span: GradientSpan,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ImageKind::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            width: None,
            height: None,
            span: GradientSpan::default(),
        }
    }
}

impl ExportConfig {
    pub fn settings(&self) -> ExportSettings {
        ExportSettings {
            kind: self.format,
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    pub hue: Option<HueSpec>,
    pub luminosity: Option<Luminosity>,
    pub seed: Option<RandomSeed>,
}

impl RandomConfig {
    pub fn source(&self) -> RandomColor {
        RandomColor::new()
            .with_hue(self.hue)
            .with_luminosity(self.luminosity)
    }

    /// Seeded generator when a seed is configured, entropy-backed otherwise.
    pub fn rng(&self) -> StdRng {
        self.seed
            .as_ref()
            .map_or_else(StdRng::from_entropy, RandomSeed::rng)
    }
}

/// Loads the user config, falling back to defaults with a warning.
pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    load_app_config_from(&path).unwrap_or_else(|err| {
        tracing::warn!(%err, "invalid config.json; using defaults");
        AppConfig::default()
    })
}

/// Strict variant for an explicitly named file: errors are returned.
pub fn load_app_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
