use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::options::{normalize, OptionsRecord, RawOptions};

const APP_DIR: &str = "qrsmith";
const SETTINGS_FILE: &str = "settings.json";

/// Window placement applied on first run, in the classic
/// `WIDTHxHEIGHT+X+Y` descriptor form the settings file uses.
pub const DEFAULT_GEOMETRY: &str = "680x620+80+60";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

/// Last-seen window state. Geometry is only meaningful (and only
/// persisted) while the window is not maximized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowState {
    pub maximized: bool,
    pub geometry: Option<String>,
}

/// The unit persisted at the settings path: encoding options plus window
/// state. Loaded once at startup, written once on normal shutdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedConfig {
    pub window: WindowState,
    pub options: OptionsRecord,
}

/// On-disk shape. Options stay raw here; `normalize` repairs them on load.
#[derive(Debug, Default, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    maximized: bool,
    #[serde(default)]
    geometry: Option<String>,
    #[serde(default)]
    qr_options: RawOptions,
}

#[derive(Debug, Serialize)]
struct SettingsDocumentOut<'a> {
    maximized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    geometry: Option<&'a str>,
    qr_options: &'a OptionsRecord,
}

/// Never fails: a missing, unreadable, or malformed settings file degrades
/// to the all-defaults record.
pub fn load() -> PersistedConfig {
    let (xdg_config_home, home) = config_env_dirs();
    match settings_path(xdg_config_home.as_deref(), home.as_deref()) {
        Ok(path) => load_from_path(&path),
        Err(err) => {
            tracing::warn!(?err, "cannot resolve settings path; using defaults");
            PersistedConfig::default()
        }
    }
}

/// Best-effort: write failures are swallowed. Losing settings persistence
/// is not a correctness issue for the running session.
pub fn save(config: &PersistedConfig) {
    let (xdg_config_home, home) = config_env_dirs();
    let path = match settings_path(xdg_config_home.as_deref(), home.as_deref()) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(?err, "cannot resolve settings path; settings not saved");
            return;
        }
    };
    if let Err(err) = save_to_path(config, &path) {
        tracing::warn!(?err, path = %path.display(), "failed to write settings");
    }
}

fn load_from_path(path: &Path) -> PersistedConfig {
    if !path.exists() {
        return PersistedConfig::default();
    }
    let document = match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str::<SettingsDocument>(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, path = %path.display(), "malformed settings file; using defaults");
            SettingsDocument::default()
        }),
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "failed to read settings; using defaults");
            SettingsDocument::default()
        }
    };

    PersistedConfig {
        window: WindowState {
            maximized: document.maximized,
            geometry: document.geometry,
        },
        options: normalize(&document.qr_options, &OptionsRecord::default()),
    }
}

fn save_to_path(config: &PersistedConfig, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let document = SettingsDocumentOut {
        maximized: config.window.maximized,
        geometry: if config.window.maximized {
            None
        } else {
            config.window.geometry.as_deref()
        },
        qr_options: &config.options,
    };
    let contents = serde_json::to_string_pretty(&document)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    fs::write(path, contents)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn settings_path(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(APP_DIR);
    path.push(SETTINGS_FILE);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

/// Parsed form of the `"WIDTHxHEIGHT+X+Y"` descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
}

impl WindowGeometry {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (width, rest) = raw.split_once('x')?;
        let plus = rest.find(['+', '-'])?;
        let (height, position) = rest.split_at(plus);

        let position = position.strip_prefix('+').unwrap_or(position);
        let split = position[1..].find(['+', '-']).map(|index| index + 1)?;
        let (x, y) = position.split_at(split);
        let y = y.strip_prefix('+').unwrap_or(y);

        let width = width.parse().ok().filter(|value| *value > 0)?;
        let height = height.parse().ok().filter(|value| *value > 0)?;
        Some(Self {
            width,
            height,
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        })
    }
}

impl std::fmt::Display for WindowGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}{:+}{:+}",
            self.width, self.height, self.x, self.y
        )
    }
}
