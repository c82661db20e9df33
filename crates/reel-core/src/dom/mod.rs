//! A small retained element tree that widgets mutate.
//!
//! This is the platform layer the widgets call into: an arena of elements with
//! classes, attributes, a sheet/inline style pair and a deliberately tiny
//! layout model (see [`Document::computed_width`]). It plays the role a
//! browser DOM plays for a script, minus everything widgets never touch.

mod layout;
mod style;

pub use indextree::NodeId;
pub use style::{ComputedStyle, Display, Style, Visibility};

use indextree::Arena;

/// Class that visually hides an element while keeping it readable by
/// assistive technology. Layout treats such an element as 1px wide.
pub const SR_ONLY: &str = "sr-only";

/// What a node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

/// An element: tag, classes, attributes and styles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    /// Declared by the "stylesheet".
    pub sheet: Style,
    /// Set by scripts; overrides `sheet`.
    pub inline: Style,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The element tree.
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<NodeKind>,
    root: NodeId,
    viewport_width: f32,
}

impl Document {
    /// An empty document whose root `html` element is `viewport_width` px wide.
    pub fn new(viewport_width: f32) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeKind::Element(Element::new("html")));
        Self {
            arena,
            root,
            viewport_width,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(0.0);
    }

    // --- Nodes ---

    /// A detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(NodeKind::Element(Element::new(tag)))
    }

    /// A detached element carrying `classes`.
    pub fn create_element_with_classes(&mut self, tag: &str, classes: &[&str]) -> NodeId {
        let mut element = Element::new(tag);
        element.classes = classes.iter().map(|c| c.to_string()).collect();
        self.arena.new_node(NodeKind::Element(element))
    }

    /// A detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeKind::Text(text.to_string()))
    }

    /// Whether `node` is alive (created and not removed).
    pub fn exists(&self, node: NodeId) -> bool {
        self.kind(node).is_some()
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        let entry = self.arena.get(node)?;
        (!entry.is_removed()).then(|| entry.get())
    }

    fn kind_mut(&mut self, node: NodeId) -> Option<&mut NodeKind> {
        let entry = self.arena.get_mut(node)?;
        if entry.is_removed() {
            return None;
        }
        Some(entry.get_mut())
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match self.kind(node)? {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match self.kind_mut(node)? {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    // --- Tree structure ---

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.exists(parent) || !self.exists(child) {
            return;
        }
        child.detach(&mut self.arena);
        if let Err(err) = parent.checked_append(child, &mut self.arena) {
            tracing::warn!(%err, "append_child rejected");
        }
    }

    /// Insert `child` as the first child of `parent`, moving it if attached.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.exists(parent) || !self.exists(child) {
            return;
        }
        child.detach(&mut self.arena);
        if let Err(err) = parent.checked_prepend(child, &mut self.arena) {
            tracing::warn!(%err, "prepend_child rejected");
        }
    }

    /// Insert `child` right before `reference`, moving it if attached.
    pub fn insert_before(&mut self, reference: NodeId, child: NodeId) {
        if !self.exists(reference) || !self.exists(child) || reference == child {
            return;
        }
        child.detach(&mut self.arena);
        if let Err(err) = reference.checked_insert_before(child, &mut self.arena) {
            tracing::warn!(%err, "insert_before rejected");
        }
    }

    /// Unlink `node` (and its subtree) from its parent. The node stays alive
    /// and can be inserted again or cloned.
    pub fn detach(&mut self, node: NodeId) {
        if self.exists(node) {
            node.detach(&mut self.arena);
        }
    }

    /// Destroy `node` and its whole subtree.
    pub fn remove(&mut self, node: NodeId) {
        if self.exists(node) {
            node.remove_subtree(&mut self.arena);
        }
    }

    /// Deep copy of `node`, detached.
    pub fn clone_node(&mut self, node: NodeId) -> Option<NodeId> {
        let kind = self.kind(node)?.clone();
        let copy = self.arena.new_node(kind);
        for child in self.children(node) {
            if let Some(child_copy) = self.clone_node(child) {
                self.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    /// All child nodes, text included.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        if !self.exists(node) {
            return Vec::new();
        }
        node.children(&self.arena).collect()
    }

    /// Child elements only.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .into_iter()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    /// `node` and its ancestors, innermost first.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        if !self.exists(node) {
            return Vec::new();
        }
        node.ancestors(&self.arena).collect()
    }

    /// Whether `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    /// Whether `node` hangs below the root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Nearest element among `node` and its ancestors carrying `class`.
    pub fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.ancestors(node)
            .into_iter()
            .find(|id| self.has_class(*id, class))
    }

    /// Descendants of `scope` (not `scope` itself) carrying `class`, in
    /// document order.
    pub fn elements_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        if !self.exists(scope) {
            return Vec::new();
        }
        scope
            .descendants(&self.arena)
            .skip(1)
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    pub fn first_by_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.elements_by_class(scope, class).into_iter().next()
    }

    // --- Classes and attributes ---

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attribute(name)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        match el.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.retain(|(key, _)| key != name);
        }
    }

    // --- Styles ---

    /// Replace the sheet style of `node`.
    pub fn set_sheet_style(&mut self, node: NodeId, style: Style) {
        if let Some(el) = self.element_mut(node) {
            el.sheet = style;
        }
    }

    /// Edit the inline style of `node`.
    pub fn set_inline(&mut self, node: NodeId, edit: impl FnOnce(&mut Style)) {
        if let Some(el) = self.element_mut(node) {
            edit(&mut el.inline);
        }
    }

    /// Drop every inline declaration of `node`.
    pub fn clear_inline(&mut self, node: NodeId) {
        if let Some(el) = self.element_mut(node) {
            el.inline = Style::default();
        }
    }

    // --- Text ---

    /// Concatenated text of `node`'s subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        if !self.exists(node) {
            return String::new();
        }
        node.descendants(&self.arena)
            .filter_map(|id| match self.kind(id) {
                Some(NodeKind::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace the children of `node` with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        for child in self.children(node) {
            self.remove(child);
        }
        let text = self.create_text(text);
        self.append_child(node, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(doc: &mut Document, labels: &[&str]) -> (NodeId, Vec<NodeId>) {
        let list = doc.create_element_with_classes("ol", &["list"]);
        let root = doc.root();
        doc.append_child(root, list);
        let items = labels
            .iter()
            .map(|label| {
                let item = doc.create_element_with_classes("li", &["item"]);
                doc.set_text_content(item, label);
                doc.append_child(list, item);
                item
            })
            .collect();
        (list, items)
    }

    #[test]
    fn insertion_order() {
        let mut doc = Document::new(800.0);
        let (list, items) = list_with(&mut doc, &["b", "c"]);
        let a = doc.create_element("li");
        doc.prepend_child(list, a);
        let d = doc.create_element("li");
        doc.append_child(list, d);
        let between = doc.create_element("li");
        doc.insert_before(items[1], between);

        assert_eq!(doc.children(list), vec![a, items[0], between, items[1], d]);
    }

    #[test]
    fn clone_is_deep_and_detached() {
        let mut doc = Document::new(800.0);
        let (list, items) = list_with(&mut doc, &["first"]);
        doc.set_attribute(items[0], "tabindex", "-1");

        let copy = doc.clone_node(items[0]).expect("clone");
        assert_ne!(copy, items[0]);
        assert_eq!(doc.parent(copy), None);
        assert_eq!(doc.text_content(copy), "first");
        assert!(doc.has_class(copy, "item"));
        assert_eq!(doc.attribute(copy, "tabindex"), Some("-1"));

        doc.append_child(list, copy);
        assert_eq!(doc.elements_by_class(list, "item"), vec![items[0], copy]);
    }

    #[test]
    fn detach_keeps_node_remove_destroys_it() {
        let mut doc = Document::new(800.0);
        let (list, items) = list_with(&mut doc, &["a", "b"]);

        doc.detach(items[0]);
        assert!(doc.exists(items[0]));
        assert!(!doc.is_connected(items[0]));
        assert_eq!(doc.text_content(items[0]), "a");

        doc.remove(items[1]);
        assert!(!doc.exists(items[1]));
        assert!(doc.children(list).is_empty());
    }

    #[test]
    fn closest_walks_up_including_self() {
        let mut doc = Document::new(800.0);
        let (list, items) = list_with(&mut doc, &["a"]);
        assert_eq!(doc.closest(items[0], "item"), Some(items[0]));
        assert_eq!(doc.closest(items[0], "list"), Some(list));
        assert_eq!(doc.closest(items[0], "missing"), None);
    }

    #[test]
    fn classes_and_attributes() {
        let mut doc = Document::new(800.0);
        let node = doc.create_element("div");
        doc.add_class(node, "a");
        doc.add_class(node, "a");
        doc.toggle_class(node, "b", true);
        assert_eq!(doc.element(node).map(|el| el.classes().count()), Some(2));
        doc.toggle_class(node, "a", false);
        assert!(!doc.has_class(node, "a"));

        doc.set_attribute(node, "disabled", "true");
        doc.set_attribute(node, "disabled", "false");
        assert_eq!(doc.attribute(node, "disabled"), Some("false"));
        doc.remove_attribute(node, "disabled");
        assert_eq!(doc.attribute(node, "disabled"), None);
    }

    #[test]
    fn set_text_replaces_children() {
        let mut doc = Document::new(800.0);
        let node = doc.create_element("span");
        doc.set_text_content(node, "1");
        doc.set_text_content(node, "2");
        assert_eq!(doc.children(node).len(), 1);
        assert_eq!(doc.text_content(node), "2");
    }
}
