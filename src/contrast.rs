// SPDX-License-Identifier: PMPL-1.0-or-later
//! WCAG relative luminance and contrast ratio math.
//!
//! <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
//! <https://www.w3.org/TR/WCAG21/#dfn-contrast-ratio>

use crate::color::{flatten, Color};

/// Font weights that count as bold for threshold purposes
const BOLD_WEIGHTS: &[&str] = &["bold", "bolder", "700", "800", "900"];

/// Calculate relative luminance per WCAG 2.x.
///
/// Channels are 0-255; the sRGB-to-linear transform uses the 0.03928
/// cutoff published with the contrast formula.
pub fn relative_luminance(red: f64, green: f64, blue: f64) -> f64 {
    let linear = |c: f64| {
        let v = c / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(red) + 0.7152 * linear(green) + 0.0722 * linear(blue)
}

/// Contrast ratio between two resolved colors, in [1, 21].
///
/// Symmetric: swapping the arguments gives the same ratio.
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a.red, a.green, a.blue);
    let lb = relative_luminance(b.red, b.green, b.blue);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// Contrast ratio of a foreground over a resolved background.
///
/// A translucent foreground is composited over the background before the
/// luminances are compared; the background must already be fully resolved.
pub fn effective_contrast(fg: Color, bg: Color) -> f64 {
    let fg = if fg.alpha < 1.0 { flatten(fg, bg) } else { fg };
    contrast_ratio(fg, bg)
}

/// Whether a contrast ratio meets the requirement for the given text size.
///
/// Small text needs 7:1, large text 4.5:1 (WCAG 1.4.6 enhanced contrast).
/// A ratio exactly at the threshold does not pass.
pub fn is_sufficient(ratio: f64, font_size_px: f64, bold: bool) -> bool {
    let small = (bold && font_size_px < 18.6667) || (!bold && font_size_px < 24.0);
    let required = if small { 7.0 } else { 4.5 };
    ratio > required
}

/// Whether a computed `font-weight` value renders as bold
pub fn is_bold_weight(weight: &str) -> bool {
    BOLD_WEIGHTS.contains(&weight.trim())
}
