//! Width/height resolution.
//!
//! The model is intentionally small: a declared width wins, `auto` takes the
//! parent's content box, `sr-only` collapses to 1px and the root is as wide
//! as the viewport. Heights are only needed to align controls, so `auto`
//! heights just stack children.

use super::{ComputedStyle, Display, Document, NodeId, NodeKind, SR_ONLY};

impl Document {
    /// Inline over sheet over defaults. `None` for text and dead nodes.
    pub fn computed_style(&self, node: NodeId) -> Option<ComputedStyle> {
        let el = self.element(node)?;
        Some(ComputedStyle::from(el.inline.over(&el.sheet)))
    }

    /// Attached below the root with no `display: none` on the way up.
    pub fn is_rendered(&self, node: NodeId) -> bool {
        let chain = self.ancestors(node);
        if chain.last() != Some(&self.root) {
            return false;
        }
        chain.iter().all(|id| match self.kind(*id) {
            Some(NodeKind::Element(_)) => self
                .computed_style(*id)
                .is_some_and(|style| style.display != Display::None),
            Some(NodeKind::Text(_)) => true,
            None => false,
        })
    }

    /// The width a style query would report.
    ///
    /// Rendered nodes report their used width. Nodes that are not rendered
    /// only know a declared width; with an `auto` width there is nothing to
    /// report and the result is `None`.
    pub fn computed_width(&self, node: NodeId) -> Option<f32> {
        if self.is_rendered(node) {
            Some(self.layout_width(node))
        } else {
            self.computed_style(node)?.width
        }
    }

    /// Used width of a rendered node, 0 otherwise.
    pub fn offset_width(&self, node: NodeId) -> f32 {
        if self.is_rendered(node) {
            self.layout_width(node)
        } else {
            0.0
        }
    }

    /// Used height of a rendered node, 0 otherwise.
    pub fn offset_height(&self, node: NodeId) -> f32 {
        if !self.is_rendered(node) {
            return 0.0;
        }
        self.layout_height(node)
    }

    fn layout_width(&self, node: NodeId) -> f32 {
        if node == self.root {
            return self.viewport_width;
        }
        if self.has_class(node, SR_ONLY) {
            return 1.0;
        }
        if let Some(width) = self.computed_style(node).and_then(|style| style.width) {
            return width.max(0.0);
        }
        match self.parent(node) {
            Some(parent) => self.content_width(parent),
            None => 0.0,
        }
    }

    fn content_width(&self, node: NodeId) -> f32 {
        let style = self.computed_style(node).unwrap_or_default();
        (self.layout_width(node) - style.padding_left - style.padding_right).max(0.0)
    }

    fn layout_height(&self, node: NodeId) -> f32 {
        match self.computed_style(node) {
            Some(style) if style.display == Display::None => 0.0,
            Some(ComputedStyle {
                height: Some(height),
                ..
            }) => height.max(0.0),
            Some(style) => {
                let stacked: f32 = self
                    .element_children(node)
                    .into_iter()
                    .map(|child| self.layout_height(child))
                    .sum();
                stacked + style.margin_bottom
            }
            None => 0.0,
        }
    }
}
