//! `status` — control-point availability probe.

use breathlight_lib::paths;
use breathlight_lib::sink::SysfsSink;

use super::{ControlPointJson, Result, StatusOutput, effective_config, kv, kv_width};

const CONTROL_POINTS: [(&str, &str); 4] = [
    ("Backlight level:", paths::LCD_BACKLIGHT),
    ("Blink mode:", paths::BREATH_BLINK_MODE),
    ("Channel select:", paths::BREATH_OUTN),
    ("Grade:", paths::BREATH_GRADE),
];

pub(super) fn cmd_status(json: bool, root: Option<String>) -> Result<()> {
    let config = effective_config(root);
    let sink = SysfsSink::with_root(&config.sysfs_root);

    let control_points: Vec<ControlPointJson> = CONTROL_POINTS
        .iter()
        .map(|&(name, point)| {
            let path = sink.resolve(point);
            ControlPointJson {
                name: name.trim_end_matches(':').to_lowercase(),
                path: path.display().to_string(),
                present: path.exists(),
            }
        })
        .collect();

    if json {
        let output = StatusOutput {
            version: env!("CARGO_PKG_VERSION").into(),
            sysfs_root: config.sysfs_root.clone(),
            control_points,
        };
        let json_str = serde_json::to_string_pretty(&output).map_err(|e| {
            breathlight_lib::BreathlightError::Config(format!("JSON serialization failed: {e}"))
        })?;
        println!("{json_str}");
        return Ok(());
    }

    let keys: Vec<&str> = CONTROL_POINTS
        .iter()
        .map(|&(name, _)| name)
        .chain(["Version:", "Sysfs root:"])
        .collect();
    let w = kv_width(&keys);

    kv("Version:", env!("CARGO_PKG_VERSION"), w);
    kv("Sysfs root:", &config.sysfs_root, w);
    for (point, &(name, _)) in control_points.iter().zip(CONTROL_POINTS.iter()) {
        let presence = if point.present { "ok" } else { "missing" };
        kv(name, format!("{} ({presence})", point.path), w);
    }
    Ok(())
}
