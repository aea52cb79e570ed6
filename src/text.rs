// SPDX-License-Identifier: PMPL-1.0-or-later
//! Collaborator interfaces for text measurement and language detection.
//!
//! Both concerns live outside the contrast engine proper: a renderer knows
//! real glyph advances, and a language pipeline knows real language. The
//! traits here are the narrow seams the evaluator consumes; the bundled
//! implementations are the estimators used when no better collaborator is
//! wired in.

/// Estimates the rendered pixel width of a text run.
///
/// `None` signals that estimation is not possible for this font; the
/// gradient evaluator then falls back to checking every gradient stop.
pub trait TextWidthEstimator {
    /// Estimated width in pixels for `text` at `size_px`
    fn estimate_px(&self, family: &str, size_px: f64, bold: bool, italic: bool, text: &str)
        -> Option<f64>;
}

/// Decides whether a text run is human-language content.
///
/// Icon-font ligatures and symbolic glyph runs are exempt from the
/// contrast requirement, so the evaluator asks before classifying.
pub trait LanguageDetector {
    /// Whether `text` reads as human language
    fn is_human_language(&self, text: &str) -> bool;
}

/// Average glyph advances per font family, as a fraction of the font size
const FAMILY_ADVANCES: &[(&str, f64)] = &[
    ("arial", 0.53),
    ("helvetica", 0.53),
    ("verdana", 0.58),
    ("tahoma", 0.55),
    ("georgia", 0.51),
    ("times new roman", 0.48),
    ("courier new", 0.60),
];

/// Width estimator built on per-family average glyph advances.
///
/// Rough by construction: it answers "where does the last character sit
/// over the gradient", not typesetting questions. Families outside its
/// table yield `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageGlyphWidths;

impl TextWidthEstimator for AverageGlyphWidths {
    fn estimate_px(
        &self,
        family: &str,
        size_px: f64,
        bold: bool,
        italic: bool,
        text: &str,
    ) -> Option<f64> {
        if size_px <= 0.0 || text.is_empty() {
            return None;
        }

        let family = normalize_family(family);
        let advance = FAMILY_ADVANCES
            .iter()
            .find(|(name, _)| *name == family)
            .map(|(_, advance)| *advance)?;

        let mut width = text.chars().count() as f64 * size_px * advance;
        if bold {
            width *= 1.05;
        }
        if italic {
            width *= 1.02;
        }
        Some(width)
    }
}

/// First family of a `font-family` list, unquoted and generic-aliased.
///
/// `serif` and `sans-serif` map to their classic defaults, the same
/// aliasing browsers report on stock installs.
fn normalize_family(family: &str) -> String {
    let first = family
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_lowercase();
    match first.as_str() {
        "serif" => "times new roman".to_string(),
        "sans-serif" => "arial".to_string(),
        other => other.to_string(),
    }
}

/// Language detector built on word-structure heuristics.
///
/// Human-language words carry vowel structure; icon ligature runs, private
/// use area glyphs, and pure-symbol text do not.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDetector;

impl LanguageDetector for HeuristicDetector {
    fn is_human_language(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        // Private Use Area codepoints are icon-font glyphs
        if text.chars().any(|c| ('\u{E000}'..='\u{F8FF}').contains(&c)) {
            return false;
        }

        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| w.chars().any(|c| c.is_alphabetic()))
            .collect();
        if words.is_empty() {
            return false;
        }

        let with_vowels = words.iter().filter(|w| has_vowel_structure(w)).count();
        with_vowels * 2 >= words.len()
    }
}

/// Whether a word alternates consonants and vowels the way natural
/// language does (at minimum: contains a vowel)
fn has_vowel_structure(word: &str) -> bool {
    let vowels = ['a', 'e', 'i', 'o', 'u', 'y'];
    let lower = word.to_lowercase();
    // Non-Latin alphabetic text gets the benefit of the doubt
    if lower.chars().any(|c| c.is_alphabetic() && !c.is_ascii()) {
        return true;
    }
    lower.chars().any(|c| vowels.contains(&c))
}
