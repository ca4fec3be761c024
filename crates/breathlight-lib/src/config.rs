//! Tool configuration — TOML-based, platform-aware paths.
//!
//! The control-point identifiers and the priority order are compile-time
//! constants and deliberately not configurable; the config only carries the
//! sysfs root override and cosmetic CLI defaults.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::parse_color;
use crate::hal::LightId;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# breathlight configuration — changes made outside the tool may be overwritten.\n\n";

/// Color used by `on` for lights without a configured entry.
pub const DEFAULT_ON_COLOR: &str = "#FFFFFF";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root prepended to sysfs control points. Default: "/". Lets tests and
    /// tooling drive a scratch tree instead of the live device.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: String,

    /// Per-light default on-colors, keyed by light name.
    /// Example in TOML: `[colors]` / `buttons = "#FF0000"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

fn default_sysfs_root() -> String {
    "/".into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sysfs_root: default_sysfs_root(),
            colors: HashMap::new(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The `sysfs_root` field is empty or whitespace-only.
    EmptySysfsRoot,
    /// A `colors` key is not a known light name.
    UnknownLight(String),
    /// A `colors` entry could not be parsed as a color.
    InvalidColor { light: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySysfsRoot => write!(f, "sysfs_root cannot be empty"),
            ValidationError::UnknownLight(name) => {
                write!(f, "colors[{name}]: not a known light name")
            }
            ValidationError::InvalidColor { light, reason } => {
                write!(f, "colors[{light}]: {reason}")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("breathlight"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from the default path, returning the config and any parse
    /// warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Load config from an arbitrary path, returning the config and any parse
    /// warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Save config to the default platform path.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory",
            ));
        };
        self.save_to(&path)
    }

    /// Save config to an arbitrary path atomically (write to temp file, then
    /// rename).
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Default on-color for `id`: the configured entry, or
    /// [`DEFAULT_ON_COLOR`].
    pub fn on_color(&self, id: LightId) -> crate::error::Result<u32> {
        match self.colors.get(id.name()) {
            Some(s) => parse_color(s),
            None => parse_color(DEFAULT_ON_COLOR),
        }
    }

    /// Check the config for problems. Returns an empty list when valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.sysfs_root.trim().is_empty() {
            errors.push(ValidationError::EmptySysfsRoot);
        }
        for (light, color) in &self.colors {
            if light.parse::<LightId>().is_err() {
                errors.push(ValidationError::UnknownLight(light.clone()));
            } else if let Err(e) = parse_color(color) {
                errors.push(ValidationError::InvalidColor {
                    light: light.clone(),
                    reason: e.to_string(),
                });
            }
        }
        errors
    }
}
