// SPDX-License-Identifier: PMPL-1.0-or-later
//! Linear-gradient backgrounds: parsing and the directional sampling policy.
//!
//! Only left-to-right gradients are computed. For `to right`, the first
//! stop sits under the first character and the color under the last
//! character is interpolated from the text's estimated width, so contrast
//! is checked at both ends of the text run. Other directions change which
//! end of the string sits over which stop; inferring that is out of scope,
//! so they are deliberately reported for manual review instead of being
//! guessed at.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::color::{interpolate, parse_css_color, Color};
use crate::contrast::{effective_contrast, is_sufficient};

/// Direction of a linear gradient, as far as this engine classifies it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    /// `90deg` - left to right
    ToRight,
    /// `-90deg` - right to left
    ToLeft,
    /// Any other direction, or a gradient kind this engine does not parse
    Other,
}

/// A parsed gradient background: a direction and its stops in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Classified direction
    pub direction: GradientDirection,
    /// Color stops in source order
    pub stops: Vec<Color>,
}

/// Whether a background value declares a gradient
pub fn is_gradient(value: &str) -> bool {
    value.contains("gradient(")
}

impl Gradient {
    /// Parse a gradient declaration.
    ///
    /// Stops are the `rgb()`/`rgba()` colors in source order, each parsed
    /// with the evaluated element's ambient opacity. Gradient kinds other
    /// than `linear-gradient` classify as [`GradientDirection::Other`] and
    /// end up warned about rather than computed.
    pub fn parse(value: &str, ambient_opacity: f64) -> Option<Gradient> {
        let value = value.trim();
        if !is_gradient(value) {
            return None;
        }

        let direction = match value.strip_prefix("linear-gradient(") {
            Some(rest) => match rest.split(',').next().map(str::trim) {
                Some("90deg") => GradientDirection::ToRight,
                Some("-90deg") => GradientDirection::ToLeft,
                _ => GradientDirection::Other,
            },
            None => GradientDirection::Other,
        };

        let stop_re = Regex::new(r"rgba?\(\d+,\s*\d+,\s*\d+(?:,\s*\d*(?:\.\d+)?)?\)").ok()?;
        let stops = stop_re
            .find_iter(value)
            .filter_map(|m| parse_css_color(m.as_str(), ambient_opacity))
            .collect();

        Some(Gradient { direction, stops })
    }
}

/// Result of checking text contrast over a gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientOutcome {
    /// Every sampled position met the required ratio
    Sufficient,
    /// At least one sample fell at or below the required ratio
    Insufficient,
    /// Direction not computed by this engine; needs human review
    Unverifiable,
}

/// Check a foreground color against a gradient background.
///
/// `last_char_ratio` is estimated text width over element width: how far
/// along the gradient the final character sits. When it is unknown
/// (estimation failed, or the element has no usable width), every stop is
/// checked instead.
pub fn evaluate(
    gradient: &Gradient,
    fg: Color,
    font_size_px: f64,
    bold: bool,
    last_char_ratio: Option<f64>,
) -> GradientOutcome {
    if gradient.direction != GradientDirection::ToRight {
        return GradientOutcome::Unverifiable;
    }

    let (first, last) = match (gradient.stops.first(), gradient.stops.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return GradientOutcome::Unverifiable,
    };

    let sufficient = |bg: Color| is_sufficient(effective_contrast(fg, bg), font_size_px, bold);

    let all_pass = match last_char_ratio {
        Some(ratio) => {
            let last_char_bg = interpolate(first, last, ratio);
            sufficient(first) && sufficient(last_char_bg)
        }
        None => gradient.stops.iter().all(|stop| sufficient(*stop)),
    };

    if all_pass {
        GradientOutcome::Sufficient
    } else {
        GradientOutcome::Insufficient
    }
}
