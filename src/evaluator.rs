// SPDX-License-Identifier: PMPL-1.0-or-later
//! Per-element contrast evaluation.
//!
//! Each element is evaluated independently: preconditions run as guard
//! clauses first, then the text-shadow short-circuit, then background
//! resolution, and only then the color math. Every branch ends in a
//! verdict; nothing here is fatal. Results append to one set in document
//! order.

use tracing::info;

use crate::background::{resolve_background, BackgroundValue};
use crate::color::{parse_css_color, Color};
use crate::contrast::{effective_contrast, is_bold_weight, is_sufficient};
use crate::gradient::{self, Gradient, GradientOutcome};
use crate::page::{leading_i32, ElementFacts, Node, NodeId, StyleTree};
use crate::text::{AverageGlyphWidths, HeuristicDetector, LanguageDetector, TextWidthEstimator};
use crate::verdict::{Evaluation, EvaluationSet, ResultCode, Verdict};

/// Structural tags that never hold candidate text of their own
const STRUCTURAL_TAGS: &[&str] = &["head", "body", "html", "script", "style", "meta"];

/// Evaluate every candidate element of a page, in document order.
pub fn evaluate_page(
    tree: &StyleTree,
    estimator: &dyn TextWidthEstimator,
    detector: &dyn LanguageDetector,
) -> EvaluationSet {
    let mut results = EvaluationSet::new();
    for id in tree.in_document_order() {
        if let Some(evaluation) = evaluate_element(tree, id, estimator, detector) {
            results.add(evaluation);
        }
    }
    info!(
        elements = results.len(),
        failed = results.failed().len(),
        "contrast evaluation complete"
    );
    results
}

/// [`evaluate_page`] with the bundled estimator and language heuristic.
pub fn evaluate_page_with_defaults(tree: &StyleTree) -> EvaluationSet {
    evaluate_page(tree, &AverageGlyphWidths, &HeuristicDetector)
}

/// Evaluate a single element. Returns `None` for structural tags, which
/// are skipped without a verdict.
pub fn evaluate_element(
    tree: &StyleTree,
    id: NodeId,
    estimator: &dyn TextWidthEstimator,
    detector: &dyn LanguageDetector,
) -> Option<Evaluation> {
    let node = tree.node(id);

    if STRUCTURAL_TAGS.contains(&node.tag.as_str()) {
        return None;
    }

    if let Some(evaluation) = precondition_verdict(&node.facts) {
        return Some(evaluation.with_pointer(&node.pointer));
    }

    // A tight text shadow can carry the contrast by itself; that takes
    // priority over any color analysis and is not programmatically
    // verifiable.
    if text_shadow_needs_review(&node.style.text_shadow) {
        return Some(
            Evaluation::new(
                Verdict::Warning,
                ResultCode::TextShadow,
                "Element has a text shadow that needs manual verification.",
            )
            .with_pointer(&node.pointer),
        );
    }

    let opacity = node.style.opacity_value();

    let evaluation = match resolve_background(tree, id, opacity) {
        BackgroundValue::Image => Evaluation::new(
            Verdict::Warning,
            ResultCode::ImageBackground,
            "Element has an image background; contrast cannot be determined.",
        ),
        BackgroundValue::Gradient(gradient) => {
            evaluate_over_gradient(node, &gradient, opacity, estimator, detector)
        }
        BackgroundValue::Solid(bg) => evaluate_over_solid(node, bg, opacity, detector),
        // resolve_background never yields Unresolved
        BackgroundValue::Unresolved => unreachable!("resolver always resolves"),
    };

    Some(evaluation.with_pointer(&node.pointer))
}

/// Inapplicability guards, each with its own result code. Composed ahead
/// of the evaluation body; the first that matches wins.
fn precondition_verdict(facts: &ElementFacts) -> Option<Evaluation> {
    let inapplicable = |code, description: &str| {
        Some(Evaluation::new(Verdict::Inapplicable, code, description))
    };

    if !facts.visible {
        return inapplicable(ResultCode::NotVisible, "Element is not visible.");
    }
    if !facts.has_text && facts.text.trim().is_empty() {
        return inapplicable(ResultCode::NoText, "Element doesn't have text.");
    }
    if !facts.html_element {
        return inapplicable(
            ResultCode::NotHtmlElement,
            "Element is not a plain HTML content element.",
        );
    }
    if facts.widget_role {
        return inapplicable(
            ResultCode::WidgetRole,
            "Element has a semantic role that inherits from widget.",
        );
    }
    if facts.disabled_widget_label {
        return inapplicable(
            ResultCode::DisabledWidgetLabel,
            "This text is part of a label of a disabled widget.",
        );
    }
    if facts.role.as_deref() == Some("group") && facts.disabled {
        return inapplicable(
            ResultCode::DisabledGroup,
            "Element has a semantic role of group and is disabled.",
        );
    }
    None
}

/// Whether a `text-shadow` value is the six-token offset-free blur form
/// (`<r> <g> <b> 0px 0px <blur>px` with 0 < blur <= 15) that may provide
/// contrast on its own.
fn text_shadow_needs_review(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value == "none" {
        return false;
    }
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() != 6 {
        return false;
    }
    match (
        leading_i32(tokens[3]),
        leading_i32(tokens[4]),
        leading_i32(tokens[5]),
    ) {
        (Some(v), Some(h), Some(blur)) => v == 0 && h == 0 && blur > 0 && blur <= 15,
        _ => false,
    }
}

fn evaluate_over_gradient(
    node: &Node,
    gradient: &Gradient,
    opacity: f64,
    estimator: &dyn TextWidthEstimator,
    detector: &dyn LanguageDetector,
) -> Evaluation {
    if !detector.is_human_language(&node.facts.text) {
        return non_human_text();
    }

    let fg = match parse_css_color(&node.style.color, opacity) {
        Some(fg) => fg,
        None => return unparseable_foreground(),
    };

    let bold = is_bold_weight(&node.style.font_weight);
    let last_char_ratio = last_char_ratio(node, bold, estimator);
    let font_size = node.style.font_size_px();

    match gradient::evaluate(gradient, fg, font_size, bold, last_char_ratio) {
        GradientOutcome::Sufficient => Evaluation::new(
            Verdict::Passed,
            ResultCode::GradientContrastSufficient,
            "Element has a gradient background with contrast ratio above the minimum at every sampled position.",
        ),
        GradientOutcome::Insufficient => Evaluation::new(
            Verdict::Failed,
            ResultCode::GradientContrastInsufficient,
            "Element has a gradient background with contrast ratio below the minimum.",
        ),
        GradientOutcome::Unverifiable => Evaluation::new(
            Verdict::Warning,
            ResultCode::UnverifiableGradient,
            "Element has a gradient this engine can't verify; manual review required.",
        ),
    }
}

/// How far along the element the last character sits: estimated text width
/// over element width. `None` when either estimate is unavailable, which
/// switches the gradient check to every-stop mode.
fn last_char_ratio(node: &Node, bold: bool, estimator: &dyn TextWidthEstimator) -> Option<f64> {
    let italic = node.style.font_style.to_lowercase().contains("italic");
    let text_width = estimator.estimate_px(
        &node.style.font_family,
        node.style.font_size_px(),
        bold,
        italic,
        &node.facts.text,
    )?;
    match node.style.width_px() {
        Some(width) if width > 0.0 => Some(text_width / width),
        _ => None,
    }
}

fn evaluate_over_solid(
    node: &Node,
    bg: Color,
    opacity: f64,
    detector: &dyn LanguageDetector,
) -> Evaluation {
    let fg = match parse_css_color(&node.style.color, opacity) {
        Some(fg) => fg,
        None => return unparseable_foreground(),
    };

    // Checked before the language guard: identical colors are a degenerate
    // case whatever the text is, and the ordering decides which code fires.
    if fg == bg {
        return Evaluation::new(Verdict::Inapplicable, ResultCode::EqualColors, "Colors are equal.");
    }

    if !detector.is_human_language(&node.facts.text) {
        return non_human_text();
    }

    let ratio = effective_contrast(fg, bg);
    let bold = is_bold_weight(&node.style.font_weight);
    if is_sufficient(ratio, node.style.font_size_px(), bold) {
        Evaluation::new(
            Verdict::Passed,
            ResultCode::ContrastSufficient,
            &format!("Element has contrast ratio {:.2}:1, above the required minimum.", ratio),
        )
    } else {
        Evaluation::new(
            Verdict::Failed,
            ResultCode::ContrastInsufficient,
            &format!("Element has contrast ratio {:.2}:1, below the required minimum.", ratio),
        )
    }
}

fn non_human_text() -> Evaluation {
    Evaluation::new(
        Verdict::Passed,
        ResultCode::NonHumanText,
        "Element doesn't have human language text.",
    )
}

fn unparseable_foreground() -> Evaluation {
    Evaluation::new(
        Verdict::Inapplicable,
        ResultCode::UnparseableColor,
        "Element's foreground color could not be parsed.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StyleSnapshot;

    fn text_facts(text: &str) -> ElementFacts {
        ElementFacts {
            visible: true,
            has_text: true,
            text: text.to_string(),
            html_element: true,
            ..Default::default()
        }
    }

    fn text_style(color: &str, background: &str) -> StyleSnapshot {
        StyleSnapshot {
            color: color.to_string(),
            background: background.to_string(),
            font_size: "16px".to_string(),
            font_weight: "400".to_string(),
            font_family: "arial".to_string(),
            opacity: "1".to_string(),
            ..Default::default()
        }
    }

    fn single(tree: &StyleTree, id: NodeId) -> Evaluation {
        evaluate_element(tree, id, &AverageGlyphWidths, &HeuristicDetector)
            .expect("element should be evaluated")
    }

    #[test]
    fn test_structural_tags_skipped_without_verdict() {
        let mut tree = StyleTree::new();
        for tag in ["html", "head", "body", "script", "style", "meta"] {
            tree.add_root(tag, StyleSnapshot::default(), text_facts("hello"));
        }
        let results = evaluate_page_with_defaults(&tree);
        assert!(results.is_empty());
    }

    #[test]
    fn test_precondition_guards_fire_in_order() {
        let cases: Vec<(ElementFacts, ResultCode)> = vec![
            (
                ElementFacts { visible: false, ..text_facts("hi") },
                ResultCode::NotVisible,
            ),
            (
                ElementFacts { has_text: false, text: String::new(), ..text_facts("") },
                ResultCode::NoText,
            ),
            (
                ElementFacts { html_element: false, ..text_facts("hi") },
                ResultCode::NotHtmlElement,
            ),
            (
                ElementFacts { widget_role: true, ..text_facts("hi") },
                ResultCode::WidgetRole,
            ),
            (
                ElementFacts { disabled_widget_label: true, ..text_facts("hi") },
                ResultCode::DisabledWidgetLabel,
            ),
            (
                ElementFacts {
                    role: Some("group".to_string()),
                    disabled: true,
                    ..text_facts("hi")
                },
                ResultCode::DisabledGroup,
            ),
        ];

        for (facts, expected) in cases {
            let mut tree = StyleTree::new();
            let id = tree.add_root("p", text_style("rgb(0, 0, 0)", "rgb(255, 255, 255)"), facts);
            let eval = single(&tree, id);
            assert_eq!(eval.verdict, Verdict::Inapplicable);
            assert_eq!(eval.result_code, expected);
        }
    }

    #[test]
    fn test_enabled_group_is_still_evaluated() {
        let mut tree = StyleTree::new();
        let facts = ElementFacts {
            role: Some("group".to_string()),
            disabled: false,
            ..text_facts("hello there")
        };
        let id = tree.add_root("p", text_style("rgb(0, 0, 0)", "rgb(255, 255, 255)"), facts);
        assert_eq!(single(&tree, id).verdict, Verdict::Passed);
    }

    #[test]
    fn test_text_shadow_short_circuits_to_warning() {
        let mut tree = StyleTree::new();
        let mut style = text_style("rgb(0, 0, 0)", "rgb(255, 255, 255)");
        style.text_shadow = "rgb(255, 255, 255) 0px 0px 5px".to_string();
        let id = tree.add_root("p", style, text_facts("hello there"));
        let eval = single(&tree, id);
        assert_eq!(eval.verdict, Verdict::Warning);
        assert_eq!(eval.result_code, ResultCode::TextShadow);
    }

    #[test]
    fn test_text_shadow_forms() {
        // offset-free blur within range
        assert!(text_shadow_needs_review("rgb(0, 0, 0) 0px 0px 15px"));
        assert!(text_shadow_needs_review("rgb(0, 0, 0) 0 0 1px"));
        // blur out of range or zero
        assert!(!text_shadow_needs_review("rgb(0, 0, 0) 0px 0px 16px"));
        assert!(!text_shadow_needs_review("rgb(0, 0, 0) 0px 0px 0px"));
        // offsets present
        assert!(!text_shadow_needs_review("rgb(0, 0, 0) 2px 0px 5px"));
        assert!(!text_shadow_needs_review("rgb(0, 0, 0) 0px 3px 5px"));
        // not the six-token form
        assert!(!text_shadow_needs_review("none"));
        assert!(!text_shadow_needs_review(""));
        assert!(!text_shadow_needs_review("1px 1px 2px"));
    }

    #[test]
    fn test_image_background_warns() {
        let mut tree = StyleTree::new();
        let id = tree.add_root(
            "p",
            text_style("rgb(0, 0, 0)", "url(hero.png)"),
            text_facts("hello there"),
        );
        let eval = single(&tree, id);
        assert_eq!(eval.verdict, Verdict::Warning);
        assert_eq!(eval.result_code, ResultCode::ImageBackground);
    }

    #[test]
    fn test_equal_colors_beats_language_guard() {
        // Non-human text would pass, but the equal-colors branch is
        // checked first and wins.
        let mut tree = StyleTree::new();
        let id = tree.add_root(
            "p",
            text_style("rgb(7, 7, 7)", "rgb(7, 7, 7)"),
            text_facts("→ → →"),
        );
        let eval = single(&tree, id);
        assert_eq!(eval.verdict, Verdict::Inapplicable);
        assert_eq!(eval.result_code, ResultCode::EqualColors);
    }

    #[test]
    fn test_non_human_text_passes_regardless_of_ratio() {
        let mut tree = StyleTree::new();
        // Near-identical grays, hopeless ratio, but symbolic text
        let id = tree.add_root(
            "span",
            text_style("rgb(120, 120, 120)", "rgb(121, 121, 121)"),
            text_facts("\u{e5d8}"),
        );
        let eval = single(&tree, id);
        assert_eq!(eval.verdict, Verdict::Passed);
        assert_eq!(eval.result_code, ResultCode::NonHumanText);
    }

    #[test]
    fn test_black_on_white_passes() {
        let mut tree = StyleTree::new();
        let id = tree.add_root(
            "p",
            text_style("rgb(0, 0, 0)", "rgb(255, 255, 255)"),
            text_facts("hello there"),
        );
        let eval = single(&tree, id);
        assert_eq!(eval.verdict, Verdict::Passed);
        assert_eq!(eval.result_code, ResultCode::ContrastSufficient);
    }

    #[test]
    fn test_low_contrast_fails() {
        let mut tree = StyleTree::new();
        let id = tree.add_root(
            "p",
            text_style("rgb(170, 170, 170)", "rgb(204, 204, 204)"),
            text_facts("hello there"),
        );
        let eval = single(&tree, id);
        assert_eq!(eval.verdict, Verdict::Failed);
        assert_eq!(eval.result_code, ResultCode::ContrastInsufficient);
    }

    #[test]
    fn test_translucent_foreground_composited_before_ratio() {
        // 40% black over white is light gray; small text needs 7:1 and
        // this lands well below it.
        let mut tree = StyleTree::new();
        let id = tree.add_root(
            "p",
            text_style("rgba(0, 0, 0, 0.4)", "rgb(255, 255, 255)"),
            text_facts("hello there"),
        );
        assert_eq!(single(&tree, id).verdict, Verdict::Failed);
    }

    #[test]
    fn test_large_text_threshold_applies() {
        // 4.54:1 passes at 24px regular but fails at 16px
        let mut tree = StyleTree::new();
        let mut style = text_style("rgb(117, 117, 117)", "rgb(255, 255, 255)");
        style.font_size = "24px".to_string();
        let large = tree.add_root("h1", style, text_facts("big heading text"));

        let small = tree.add_root(
            "p",
            text_style("rgb(117, 117, 117)", "rgb(255, 255, 255)"),
            text_facts("small body text"),
        );

        let results = evaluate_page_with_defaults(&tree);
        assert_eq!(results.evaluations.len(), 2);
        assert_eq!(tree.node(large).tag, "h1");
        assert_eq!(results.evaluations[0].verdict, Verdict::Passed);
        assert_eq!(tree.node(small).tag, "p");
        assert_eq!(results.evaluations[1].verdict, Verdict::Failed);
    }

    #[test]
    fn test_unverifiable_gradient_warns() {
        let mut tree = StyleTree::new();
        let id = tree.add_root(
            "p",
            text_style(
                "rgb(255, 255, 255)",
                "linear-gradient(-90deg, rgb(0, 0, 0), rgb(40, 40, 40))",
            ),
            text_facts("hello there"),
        );
        let eval = single(&tree, id);
        assert_eq!(eval.verdict, Verdict::Warning);
        assert_eq!(eval.result_code, ResultCode::UnverifiableGradient);
    }

    #[test]
    fn test_results_in_document_order_with_pointers() {
        let mut tree = StyleTree::new();
        let root = tree.add_root("div", text_style("rgb(0, 0, 0)", "rgb(255, 255, 255)"), text_facts("one"));
        tree.add_child(root, "p", text_style("rgb(0, 0, 0)", "transparent"), text_facts("two"));
        tree.add_child(root, "p", text_style("rgb(255, 255, 255)", "transparent"), text_facts("three"));

        let results = evaluate_page_with_defaults(&tree);
        assert_eq!(results.len(), 3);
        // Transparent children resolve against the root's white
        assert_eq!(results.evaluations[1].verdict, Verdict::Passed);
        assert_eq!(results.evaluations[2].result_code, ResultCode::EqualColors);
        for eval in &results.evaluations {
            assert!(eval.element_pointer.is_some());
        }
    }
}
