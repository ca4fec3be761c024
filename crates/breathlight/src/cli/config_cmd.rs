//! `config` — show configuration, file locations, and validation problems.

use super::{Config, ConfigOutput, Result, kv, kv_width};

pub(super) fn cmd_config(json: bool) -> Result<()> {
    let (config, warnings) = Config::load_with_warnings();
    for w in &warnings {
        log::warn!("{w}");
    }

    let path = Config::path();
    let exists = path.as_deref().is_some_and(|p| p.exists());
    let problems: Vec<String> = config.validate().iter().map(|e| e.to_string()).collect();

    if json {
        let output = ConfigOutput {
            config_file: path.map(|p| p.display().to_string()),
            config_file_exists: exists,
            settings: config,
            problems,
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
        return Ok(());
    }

    let w = kv_width(&["Config file:", "Sysfs root:", "Colors:", "Problems:"]);
    kv(
        "Config file:",
        match &path {
            Some(p) if exists => format!("{}", p.display()),
            Some(p) => format!("{} (not created yet)", p.display()),
            None => "(no config directory)".into(),
        },
        w,
    );
    kv("Sysfs root:", &config.sysfs_root, w);
    if config.colors.is_empty() {
        kv("Colors:", "(defaults)", w);
    } else {
        let mut entries: Vec<_> = config
            .colors
            .iter()
            .map(|(light, color)| format!("{light}={color}"))
            .collect();
        entries.sort();
        kv("Colors:", entries.join(", "), w);
    }
    for problem in &problems {
        kv("Problems:", problem, w);
    }
    Ok(())
}
