// SPDX-License-Identifier: PMPL-1.0-or-later
//! Contrastbot - WCAG Text Contrast Evaluation Engine
//!
//! Part of the gitbot-fleet ecosystem. Contrastbot evaluates the contrast
//! of rendered text against its effective background, implementing the
//! "text has sufficient contrast" check (WCAG 1.4.3 Contrast Minimum /
//! 1.4.6 Contrast Enhanced, ACT rule 09o5cg).
//!
//! ## What it does
//!
//! Given a snapshot of a page's computed styles (a [`page::StyleTree`]),
//! contrastbot resolves each text element's effective background through
//! its ancestor chain, composites translucent layers, samples CSS linear
//! gradients, and applies the WCAG relative-luminance contrast formula
//! with font-size and weight dependent thresholds. One [`verdict::Evaluation`]
//! is produced per candidate element, in document order.
//!
//! ## What it does not do
//!
//! Rendering, browser automation, and accessibility-tree construction are
//! out of scope. DOM traversal facts (visibility, roles, text content) and
//! text pixel-width measurement are consumed through narrow interfaces;
//! the caller supplies them via [`page::ElementFacts`] and the traits in
//! [`text`].

pub mod background;
pub mod color;
pub mod contrast;
pub mod evaluator;
pub mod gradient;
pub mod page;
pub mod text;
pub mod verdict;
