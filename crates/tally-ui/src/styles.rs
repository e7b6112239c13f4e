//! Ayu color theme and styling functions for tally CLI output.
//!
//! Only states that need attention get color: invalid formulas, numeric
//! deviations, and anomalies. Everything else is plain text.

use owo_colors::OwoColorize;
use tally_anomaly::Direction;

use crate::terminal::supports_color;

// Ayu Dark palette
const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray

pub const ICON_PASS: &str = "\u{2713}"; // check mark
pub const ICON_WARN: &str = "\u{26A0}"; // warning sign
pub const ICON_FAIL: &str = "\u{2716}"; // heavy x
pub const ICON_UP: &str = "\u{25B2}"; // up triangle
pub const ICON_DOWN: &str = "\u{25BC}"; // down triangle

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

pub fn render_warn_icon() -> String {
    color_str(ICON_WARN, WARN)
}

pub fn render_fail_icon() -> String {
    color_str(ICON_FAIL, FAIL)
}

/// Arrow for an anomaly's side of the mean: spikes red, dips yellow.
pub fn render_direction(direction: Direction) -> String {
    match direction {
        Direction::Above => color_str(ICON_UP, FAIL),
        Direction::Below => color_str(ICON_DOWN, WARN),
    }
}

/// Signed z-score with two decimals, e.g. `+2.27`.
pub fn format_z_score(z: f64) -> String {
    format!("{:+.2}", z)
}
