// SPDX-License-Identifier: PMPL-1.0-or-later
//! CSS color values: parsing, alpha compositing, and interpolation.
//!
//! Computed styles hand us colors as strings (`transparent`, `rgb(...)`,
//! `rgba(...)`). Anything else is not an error: an unparseable background
//! simply means the background is not resolved at that element yet, and
//! resolution continues up the ancestor chain.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// An sRGB color with alpha, as read from a computed style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel, 0-255
    pub red: f64,
    /// Green channel, 0-255
    pub green: f64,
    /// Blue channel, 0-255
    pub blue: f64,
    /// Opacity, 0.0-1.0
    pub alpha: f64,
}

impl Color {
    /// Create an opaque color
    pub fn opaque(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue, alpha: 1.0 }
    }

    /// Fully transparent black, the computed value of `transparent`
    pub fn transparent() -> Self {
        Self { red: 0.0, green: 0.0, blue: 0.0, alpha: 0.0 }
    }

    /// Opaque white, the assumed page default background
    pub fn white() -> Self {
        Self::opaque(255.0, 255.0, 255.0)
    }

    /// Whether this is exactly `{0, 0, 0, 0}`
    pub fn is_fully_transparent(&self) -> bool {
        *self == Self::transparent()
    }
}

/// Parse a computed CSS color string.
///
/// `ambient_opacity` is the element's `opacity` value; it becomes the alpha
/// of an `rgb()` color, which carries no alpha of its own. An `rgba()` alpha
/// wins over the ambient opacity and is rounded to two decimal places.
/// Returns `None` for any other syntax.
pub fn parse_css_color(value: &str, ambient_opacity: f64) -> Option<Color> {
    let value = value.trim();

    // IE reports transparent instead of rgba(0, 0, 0, 0)
    if value == "transparent" {
        return Some(Color::transparent());
    }

    let rgb_re = Regex::new(r"^rgb\((\d+),\s*(\d+),\s*(\d+)\)").ok()?;
    if let Some(caps) = rgb_re.captures(value) {
        return Some(Color {
            red: caps[1].parse::<u32>().ok()?.min(255) as f64,
            green: caps[2].parse::<u32>().ok()?.min(255) as f64,
            blue: caps[3].parse::<u32>().ok()?.min(255) as f64,
            alpha: ambient_opacity,
        });
    }

    let rgba_re = Regex::new(r"^rgba\((\d+),\s*(\d+),\s*(\d+),\s*(\d*(?:\.\d+)?)\)").ok()?;
    if let Some(caps) = rgba_re.captures(value) {
        let alpha: f64 = caps[4].parse().ok()?;
        return Some(Color {
            red: caps[1].parse::<u32>().ok()?.min(255) as f64,
            green: caps[2].parse::<u32>().ok()?.min(255) as f64,
            blue: caps[3].parse::<u32>().ok()?.min(255) as f64,
            alpha: (alpha * 100.0).round() / 100.0,
        });
    }

    None
}

/// Composite a translucent foreground over a resolved background
/// (standard "over" alpha blending).
pub fn flatten(fg: Color, bg: Color) -> Color {
    let a = fg.alpha;
    Color {
        red: (1.0 - a) * bg.red + a * fg.red,
        green: (1.0 - a) * bg.green + a * fg.green,
        blue: (1.0 - a) * bg.blue + a * fg.blue,
        alpha: fg.alpha + bg.alpha * (1.0 - fg.alpha),
    }
}

/// Linear per-channel interpolation between two colors.
///
/// `ratio` 0.0 yields `from`, 1.0 yields `to`. The result is opaque: it
/// stands for a fully composited gradient sample.
pub fn interpolate(from: Color, to: Color, ratio: f64) -> Color {
    Color {
        red: from.red + (to.red - from.red) * ratio,
        green: from.green + (to.green - from.green) * ratio,
        blue: from.blue + (to.blue - from.blue) * ratio,
        alpha: 1.0,
    }
}
