use coverflow::{Element, Settings, SettingsError};
use directories::{BaseDirs, ProjectDirs};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// A tile color. `-` (or `transparent`) disables the fill.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub struct BoxColor(Srgba<f64>);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}', expected '#rgb', '#rrggbb' or '-'")]
pub struct ColorError(String);

impl BoxColor {
    pub fn transparent() -> Self {
        Self(Srgba::new(0.0, 0.0, 0.0, 0.0))
    }

    pub fn rgba(&self) -> Srgba<f64> {
        self.0
    }

    pub fn is_transparent(&self) -> bool {
        self.0.alpha == 0.0
    }
}

impl FromStr for BoxColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "transparent" => Ok(Self::transparent()),
            hex => hex
                .parse::<Srgb<u8>>()
                .map(|rgb| Self(rgb.into_format::<f64>().with_alpha(1.0)))
                .map_err(|_| ColorError(hex.to_string())),
        }
    }
}

impl fmt::Display for BoxColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transparent() {
            return write!(f, "-");
        }
        let rgb: Srgb<u8> = self.0.color.into_format();
        write!(f, "#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Style {
    /// Border around each tile.
    pub color: BoxColor,
    pub box_bg: BoxColor,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: BoxColor(Srgba::new(0.4, 0.4, 0.4, 1.0)),
            box_bg: BoxColor(Srgba::new(1.0, 1.0, 1.0, 1.0)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cover List".to_string(),
            width: 960,
            height: 420,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub carousel: Settings,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub window: WindowConfig,
    /// Skip the animated renderer even when it is available.
    #[serde(default)]
    pub force_static: bool,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Command-line values that win over the file, reapplied on every reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub selected: Option<usize>,
    pub force_static: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(selected) = self.selected {
            config.carousel.selected = Some(selected);
        }
        config.force_static |= self.force_static;
    }
}

/// Expands a leading `~` in a thumbnail path.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid carousel settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "coverlist", "coverlist")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Config, ConfigError> {
    let config: Config = builder
        .add_source(
            config::Environment::with_prefix("COVERLIST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;
    config.carousel.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    build(config::Config::builder().add_source(config::File::from(path).required(false)))
}

pub fn default_config() -> Result<Config, ConfigError> {
    build(config::Config::builder().add_source(config::File::from_str(
        DEFAULT_CONFIG,
        config::FileFormat::Toml,
    )))
}

/// Reads `path`, or the bundled sample configuration when it does not exist.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }
    log::info!(
        "No configuration at {}, using the bundled sample (write it with --init)",
        path.display()
    );
    default_config()
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let relevant = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);

                if relevant && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
