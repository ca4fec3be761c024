//! `set` / `on` / `off` — open a facade and push one state update.

use breathlight_lib::arbiter::LightState;
use breathlight_lib::color::{format_color, parse_color};
use breathlight_lib::hal::LightId;

use super::{Config, Result, effective_config, open_hal};

fn apply(light: &str, color: u32, config: &Config) -> Result<()> {
    let hal = open_hal(config);
    let handle = hal.open(light)?;
    handle.set_state(LightState::new(color))?;
    println!("{light} set to {}", format_color(color));
    Ok(())
}

pub(super) fn cmd_set(light: &str, color: &str, root: Option<String>) -> Result<()> {
    let config = effective_config(root);
    let value = parse_color(color)?;
    apply(light, value, &config)
}

pub(super) fn cmd_on(light: &str, root: Option<String>) -> Result<()> {
    let config = effective_config(root);
    let id: LightId = light.parse()?;
    let value = config.on_color(id)?;
    apply(light, value, &config)
}

pub(super) fn cmd_off(light: &str, root: Option<String>) -> Result<()> {
    let config = effective_config(root);
    apply(light, 0, &config)
}
