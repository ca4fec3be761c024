//! Control-point identifiers for the Nubia Z11 indicator hardware.
//!
//! The breathing LED is a single physical element exposed through three
//! sysfs attributes. `outn` is a shared selector register: it must be set
//! to the target channel before each `blink_mode` or `grade_parameter`
//! write, because the driver applies those writes to whichever channel was
//! selected last. Values are newline-terminated ASCII.

// ── Control points ──

/// LCD backlight brightness, 0-255.
pub const LCD_BACKLIGHT: &str = "/sys/class/leds/lcd-backlight/brightness";

/// Breathing-LED blink-mode selector. Takes one of the `BLINK_MODE_*` tokens.
pub const BREATH_BLINK_MODE: &str = "/sys/class/leds/nubia_led/blink_mode";

/// Breathing-LED channel selector (`outn`). Shared register — select before
/// every mode or grade write.
pub const BREATH_OUTN: &str = "/sys/class/leds/nubia_led/outn";

/// Breathing-LED intensity grade for the currently selected channel.
pub const BREATH_GRADE: &str = "/sys/class/leds/nubia_led/grade_parameter";

// ── Blink-mode tokens ──

/// Steady on.
pub const BLINK_MODE_ON: &str = "6";

/// Hardware-driven breathing pulse.
pub const BLINK_MODE_BREATH: &str = "3";

/// Off.
pub const BLINK_MODE_OFF: &str = "2";

// ── Channel selectors (written to `outn`) ──

/// Button backlight channel.
pub const CHANNEL_BUTTONS: u32 = 8;

/// Main red/notification channel.
pub const CHANNEL_RED: u32 = 16;

// ── Intensity grades (written to `grade_parameter`) ──

/// Grade used when the LED element serves as button backlight.
pub const GRADE_BUTTONS: u32 = 3;

/// Grade used when the same element drives the red channel — brighter, the
/// element sits behind a dimmer window in that role.
pub const GRADE_RED: u32 = 8;
