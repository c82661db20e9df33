//! Builder for the markup a [`Carousel`](super::Carousel) expects.
//!
//! ```rust,ignore
//! let mut doc = Document::new(920.0);
//! let nodes = CarouselMarkup::new(10).item_width(280.0).build(&mut doc);
//! let carousel = Carousel::new(doc, nodes.element, CarouselConfig::default(), Platform::default())?;
//! ```

use super::{
    CONTROL_CLASS, COUNTER_CLASS, COUNTER_TOTAL_CLASS, ITEM_CLASS, LIST_CLASS, WRAPPER_CLASS,
};
use reel_core::dom::{Document, NodeId, Style};

/// Handles to the nodes [`CarouselMarkup::build`] created.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselNodes {
    pub element: NodeId,
    pub wrapper: NodeId,
    pub list: NodeId,
    pub items: Vec<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub counter: Option<NodeId>,
    pub counter_total: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CarouselMarkup {
    items: Vec<String>,
    item_width: f32,
    item_height: Option<f32>,
    margin: f32,
    padding: f32,
    wrapper_width: Option<f32>,
    controls: bool,
    counter: bool,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
}

impl CarouselMarkup {
    /// `count` items labelled "Item 1", "Item 2", ...
    pub fn new(count: usize) -> Self {
        Self::with_labels((1..=count).map(|i| format!("Item {i}")))
    }

    pub fn with_labels(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            items: labels.into_iter().map(Into::into).collect(),
            item_width: 300.0,
            item_height: None,
            margin: 10.0,
            padding: 0.0,
            wrapper_width: None,
            controls: true,
            counter: true,
            attributes: Vec::new(),
            parent: None,
        }
    }

    /// Natural item width, as a stylesheet would declare it.
    pub fn item_width(mut self, width: f32) -> Self {
        self.item_width = width;
        self
    }

    pub fn item_height(mut self, height: f32) -> Self {
        self.item_height = Some(height);
        self
    }

    /// Right margin between items.
    pub fn margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Horizontal padding of the wrapper.
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Fixed wrapper width. By default the wrapper fills its parent.
    pub fn wrapper_width(mut self, width: f32) -> Self {
        self.wrapper_width = Some(width);
        self
    }

    pub fn controls(mut self, controls: bool) -> Self {
        self.controls = controls;
        self
    }

    pub fn counter(mut self, counter: bool) -> Self {
        self.counter = counter;
        self
    }

    /// Set an attribute on the carousel element, e.g. `data-loop`.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Build under `parent` instead of the document root.
    pub fn mount(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn build(self, doc: &mut Document) -> CarouselNodes {
        let element = doc.create_element_with_classes("div", &["carousel", "js-carousel"]);
        for (name, value) in &self.attributes {
            doc.set_attribute(element, name, value);
        }

        let wrapper = doc.create_element_with_classes("div", &[WRAPPER_CLASS]);
        let mut wrapper_style = Style::default().with_padding_x(self.padding);
        wrapper_style.width = self.wrapper_width;
        doc.set_sheet_style(wrapper, wrapper_style);

        let list = doc.create_element_with_classes("ol", &[LIST_CLASS]);
        let mut item_style = Style::default()
            .with_width(self.item_width)
            .with_margin_right(self.margin);
        item_style.height = self.item_height;

        let mut items = Vec::with_capacity(self.items.len());
        for label in &self.items {
            let item = doc.create_element_with_classes("li", &[ITEM_CLASS]);
            doc.set_sheet_style(item, item_style);
            let text = doc.create_text(label);
            doc.append_child(item, text);
            doc.append_child(list, item);
            items.push(item);
        }
        doc.append_child(wrapper, list);
        doc.append_child(element, wrapper);

        let (prev, next) = if self.controls {
            let bar = doc.create_element_with_classes("nav", &["carousel__controls"]);
            let prev = control(doc, "Show previous items", "‹");
            let next = control(doc, "Show next items", "›");
            doc.append_child(bar, prev);
            doc.append_child(bar, next);
            doc.append_child(element, bar);
            (Some(prev), Some(next))
        } else {
            (None, None)
        };

        let (counter, counter_total) = if self.counter {
            let line = doc.create_element_with_classes("p", &["carousel__counter"]);
            let counter = doc.create_element_with_classes("span", &[COUNTER_CLASS]);
            let separator = doc.create_text(" of ");
            let total = doc.create_element_with_classes("span", &[COUNTER_TOTAL_CLASS]);
            doc.append_child(line, counter);
            doc.append_child(line, separator);
            doc.append_child(line, total);
            doc.append_child(element, line);
            (Some(counter), Some(total))
        } else {
            (None, None)
        };

        let parent = self.parent.unwrap_or_else(|| doc.root());
        doc.append_child(parent, element);

        CarouselNodes {
            element,
            wrapper,
            list,
            items,
            prev,
            next,
            counter,
            counter_total,
        }
    }
}

fn control(doc: &mut Document, label: &str, glyph: &str) -> NodeId {
    let button = doc.create_element_with_classes("button", &["carousel__control", CONTROL_CLASS]);
    doc.set_attribute(button, "aria-label", label);
    let text = doc.create_text(glyph);
    doc.append_child(button, text);
    button
}
