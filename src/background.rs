// SPDX-License-Identifier: PMPL-1.0-or-later
//! Effective background resolution.
//!
//! Text does not render against its own element's background when that
//! background is transparent; it renders against whatever ancestor paints
//! first. The resolver classifies each element's background into a tagged
//! value and climbs the parent chain while the classification stays
//! [`BackgroundValue::Unresolved`]. The climb is an index walk over the
//! flattened tree, monotonic and bounded by tree depth. A chain that
//! exhausts without resolving yields opaque white, the page default.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{parse_css_color, Color};
use crate::gradient::{is_gradient, Gradient};
use crate::page::{NodeId, StyleTree};

/// Image-reference extensions that mark an undeterminable background
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".svg"];

/// Classification of one element's background declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackgroundValue {
    /// A single resolved color
    Solid(Color),
    /// A gradient declaration
    Gradient(Gradient),
    /// A raster or vector image reference
    Image,
    /// Transparent or unparseable; the ancestor chain decides
    Unresolved,
}

/// Whether a background value references an image file
pub fn is_image(value: &str) -> bool {
    let value = value.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| value.contains(ext))
}

/// Classify a single background declaration.
///
/// `own_opacity` is the declaring element's opacity and applies to solid
/// colors; `stop_opacity` is the evaluated element's opacity and applies
/// to gradient stops, which are sampled under the text being checked.
pub fn classify(value: &str, own_opacity: f64, stop_opacity: f64) -> BackgroundValue {
    if is_image(value) {
        return BackgroundValue::Image;
    }
    if is_gradient(value) {
        return match Gradient::parse(value, stop_opacity) {
            Some(gradient) => BackgroundValue::Gradient(gradient),
            None => BackgroundValue::Unresolved,
        };
    }
    match parse_css_color(value, own_opacity) {
        Some(color) if !color.is_fully_transparent() => BackgroundValue::Solid(color),
        _ => BackgroundValue::Unresolved,
    }
}

/// Resolve the background a node's text actually renders against.
///
/// `ambient_opacity` is the evaluated element's opacity; it carries into
/// gradient stop parsing wherever in the chain the gradient is found.
/// Never returns [`BackgroundValue::Unresolved`].
pub fn resolve_background(
    tree: &StyleTree,
    id: NodeId,
    ambient_opacity: f64,
) -> BackgroundValue {
    let mut current = id;
    loop {
        let node = tree.node(current);
        let value = node.style.background_value();
        let own_opacity = node.style.opacity_value();

        match classify(value, own_opacity, ambient_opacity) {
            BackgroundValue::Unresolved => match tree.parent(current) {
                Some(parent) => {
                    debug!(
                        from = %node.pointer,
                        "background unresolved, climbing to parent"
                    );
                    current = parent;
                }
                None => {
                    debug!("ancestor chain exhausted, assuming white page background");
                    return BackgroundValue::Solid(Color::white());
                }
            },
            resolved => return resolved,
        }
    }
}
