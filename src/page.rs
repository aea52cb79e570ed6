// SPDX-License-Identifier: PMPL-1.0-or-later
//! Array-backed page model consumed by the evaluator.
//!
//! Contrastbot does not build or traverse a live DOM. The caller (a
//! renderer, a headless-browser bridge, or a test) flattens the page into
//! a [`StyleTree`]: one node per element, each carrying its computed-style
//! snapshot and the accessibility facts the evaluator needs, with parent
//! links as plain indices. Evaluation then reads the tree without any
//! back-references into the source document.

use serde::{Deserialize, Serialize};

/// Index of a node within a [`StyleTree`]
pub type NodeId = usize;

/// Computed-style values read once per element, as raw CSS strings.
///
/// Missing properties stay empty; the evaluator treats unparseable values
/// the same as absent ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleSnapshot {
    /// `color`
    pub color: String,
    /// `background` shorthand
    pub background: String,
    /// `background-color`
    pub background_color: String,
    /// `background-image` (`none` when absent)
    pub background_image: String,
    /// `opacity`
    pub opacity: String,
    /// `font-size`, e.g. `16px`
    pub font_size: String,
    /// `font-weight`, e.g. `400` or `bold`
    pub font_weight: String,
    /// `font-style`
    pub font_style: String,
    /// `font-family`
    pub font_family: String,
    /// `text-shadow` (`none` when absent)
    pub text_shadow: String,
    /// used width, e.g. `320px`
    pub width: String,
}

impl StyleSnapshot {
    /// The element's opacity as a number, defaulting to fully opaque
    pub fn opacity_value(&self) -> f64 {
        leading_f64(&self.opacity).unwrap_or(1.0)
    }

    /// `font-size` in pixels, 0 when unparseable
    pub fn font_size_px(&self) -> f64 {
        leading_f64(&self.font_size).unwrap_or(0.0)
    }

    /// Used width in pixels, if stated
    pub fn width_px(&self) -> Option<f64> {
        leading_f64(&self.width)
    }

    /// The background value: `background-image` when set, else the
    /// `background` shorthand, else `background-color`.
    pub fn background_value(&self) -> &str {
        let image = self.background_image.trim();
        if !image.is_empty() && image != "none" {
            return image;
        }
        if !self.background.trim().is_empty() {
            return &self.background;
        }
        &self.background_color
    }
}

/// Accessibility facts supplied by the caller's DOM/accessibility-tree
/// collaborators, one set per element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementFacts {
    /// Element is rendered and visible
    pub visible: bool,
    /// Element has a text node child
    pub has_text: bool,
    /// Trimmed text content
    pub text: String,
    /// Element is a plain HTML content element
    pub html_element: bool,
    /// Element's semantic role inherits from widget
    pub widget_role: bool,
    /// Element's text is part of the accessible name of a disabled widget
    pub disabled_widget_label: bool,
    /// Explicit or implicit ARIA role, when known
    pub role: Option<String>,
    /// `disabled` or `aria-disabled` is set
    pub disabled: bool,
}

/// One element of the flattened page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Lowercase tag name
    pub tag: String,
    /// Parent index; `None` for the document root
    pub parent: Option<NodeId>,
    /// CSS-selector-like pointer into the source document
    pub pointer: String,
    /// Computed styles
    pub style: StyleSnapshot,
    /// Accessibility facts
    pub facts: ElementFacts,
}

/// A page flattened into document order with index-based parent links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleTree {
    nodes: Vec<Node>,
}

impl StyleTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root element (no parent)
    pub fn add_root(&mut self, tag: &str, style: StyleSnapshot, facts: ElementFacts) -> NodeId {
        self.push(tag, None, style, facts)
    }

    /// Append a child of an existing node.
    ///
    /// # Panics
    /// Panics if `parent` is not an index previously returned by this tree,
    /// which would break the monotonic ancestor climb.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        tag: &str,
        style: StyleSnapshot,
        facts: ElementFacts,
    ) -> NodeId {
        assert!(parent < self.nodes.len(), "parent index out of bounds");
        self.push(tag, Some(parent), style, facts)
    }

    fn push(
        &mut self,
        tag: &str,
        parent: Option<NodeId>,
        style: StyleSnapshot,
        facts: ElementFacts,
    ) -> NodeId {
        let id = self.nodes.len();
        let pointer = match parent {
            Some(p) => format!("{} > {}:nth({})", self.nodes[p].pointer, tag, id),
            None => tag.to_string(),
        };
        self.nodes.push(Node {
            tag: tag.to_lowercase(),
            parent,
            pointer,
            style,
            facts,
        });
        id
    }

    /// Node by index
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Parent index of a node, if any
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// All node indices in document order
    pub fn in_document_order(&self) -> impl Iterator<Item = NodeId> {
        0..self.nodes.len()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Parse the leading decimal number of a CSS value (`16px` -> 16.0),
/// mirroring `parseFloat` semantics.
pub(crate) fn leading_f64(value: &str) -> Option<f64> {
    let value = value.trim();
    let mut end = 0;
    for (i, c) in value.char_indices() {
        if c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    value[..end].parse().ok()
}

/// Parse the leading integer of a CSS value (`5px` -> 5),
/// mirroring `parseInt` semantics.
pub(crate) fn leading_i32(value: &str) -> Option<i32> {
    let value = value.trim();
    let mut end = 0;
    for (i, c) in value.char_indices() {
        if c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    value[..end].parse().ok()
}
