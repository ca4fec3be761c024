//! Plain LCD backlight — a stateless linear mapping, independent of the
//! breathing arbitration and its lock.

use crate::color::rgb_to_brightness;
use crate::paths;
use crate::sink::{LightSink, Result};

/// Derive a 0-255 level from `color` and write it to the backlight control
/// point. No priority logic; the caller serializes concurrent writers.
pub fn set_backlight(sink: &impl LightSink, color: u32) -> Result<()> {
    sink.write_int(paths::LCD_BACKLIGHT, u32::from(rgb_to_brightness(color)))
}
