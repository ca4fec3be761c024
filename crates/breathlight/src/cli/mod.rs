//! CLI subcommands — light control, status, configuration.

mod config_cmd;
mod set;
mod status;

use clap::Subcommand;
use serde::Serialize;

pub(super) use breathlight_lib::config::Config;
pub(super) use breathlight_lib::error::Result;
pub(super) use breathlight_lib::hal::LightHal;
pub(super) use breathlight_lib::sink::SysfsSink;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
pub(super) fn kv_width(keys: &[&str]) -> usize {
    keys.iter().map(|k| k.len()).max().unwrap_or(0) + PADDING
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{key:<width$}{value}", width = w);
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub sysfs_root: String,
    pub control_points: Vec<ControlPointJson>,
}

#[derive(Serialize)]
pub(super) struct ControlPointJson {
    pub name: String,
    pub path: String,
    pub present: bool,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Set a light to an explicit color
    Set {
        /// Light name: backlight, buttons, battery, notifications, attention
        light: String,
        /// Color: #RRGGBB or a color name
        color: String,
    },

    /// Turn a light on using its configured color
    On {
        /// Light name: backlight, buttons, battery, notifications, attention
        light: String,
    },

    /// Turn a light off
    Off {
        /// Light name: backlight, buttons, battery, notifications, attention
        light: String,
    },

    /// Show control-point availability
    Status,

    /// Show current configuration and file path
    Config,
}

/// Loaded config with the `--root` override applied.
pub(super) fn effective_config(root_override: Option<String>) -> Config {
    let mut config = Config::load();
    if let Some(root) = root_override {
        config.sysfs_root = root;
    }
    config
}

pub(super) fn open_hal(config: &Config) -> LightHal<SysfsSink> {
    LightHal::with_root(&config.sysfs_root)
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool, root: Option<String>) -> Result<()> {
    match cmd {
        Command::Set { light, color } => {
            if json {
                warn_json_unsupported("set");
            }
            set::cmd_set(&light, &color, root)
        }
        Command::On { light } => {
            if json {
                warn_json_unsupported("on");
            }
            set::cmd_on(&light, root)
        }
        Command::Off { light } => {
            if json {
                warn_json_unsupported("off");
            }
            set::cmd_off(&light, root)
        }
        Command::Status => status::cmd_status(json, root),
        Command::Config => config_cmd::cmd_config(json),
    }
}
