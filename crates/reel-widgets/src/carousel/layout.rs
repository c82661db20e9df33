//! Measuring the container and fitting items into it.

use super::Carousel;
use reel_core::dom::{Display, NodeId, Visibility, SR_ONLY};

/// Result of fitting items into the container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Layout {
    /// Items fully visible at once. Always at least 1.
    pub visible: usize,
    /// Width given to every item, in px, rounded to one decimal.
    pub item_width: f32,
    /// Right margin of an item, in px.
    pub margin: f32,
    /// Measured wrapper width, in px.
    pub container_width: f32,
}

impl Layout {
    /// Distance between the left edges of neighbouring items.
    pub fn step(&self) -> f32 {
        self.item_width + self.margin
    }

    /// Offset that shows the middle window of a loop buffer.
    pub fn window_translate(&self) -> f32 {
        -self.step() * self.visible as f32
    }
}

/// How many items of `natural` width fit into `container`, and the width
/// that makes exactly that many (plus margins) fill it.
pub fn fit(container: f32, padding: f32, margin: f32, natural: f32) -> (usize, f32) {
    let room = container - 2.0 * padding + margin;
    let slot = natural + margin;
    let visible = if slot > 0.0 {
        (room / slot).floor().max(1.0) as usize
    } else {
        1
    };
    let width = ((room / visible as f32 - margin) * 10.0).round() / 10.0;
    (visible, width.max(0.0))
}

impl Carousel {
    pub(super) fn measure(&mut self) -> Layout {
        let first = self.track().first().copied().unwrap_or(self.originals[0]);
        let item_style = self.doc.computed_style(first).unwrap_or_default();
        let measured = self.doc.computed_width(first).map(f32::trunc);

        // Without custom properties the inline width cannot be cleared and
        // re-read, so the first measurement stays authoritative.
        let natural = match (self.natural_width, measured) {
            (Some(remembered), _) if !self.platform.custom_properties => remembered,
            (_, Some(width)) => width,
            (Some(remembered), None) => remembered,
            (None, None) => 0.0,
        };
        self.natural_width = Some(natural);

        let padding = self
            .doc
            .computed_style(self.wrapper)
            .unwrap_or_default()
            .padding_left;
        let container = self.container_width();
        let (visible, item_width) = fit(
            container,
            padding,
            item_style.margin_right,
            natural.min(container),
        );
        Layout {
            visible,
            item_width,
            margin: item_style.margin_right,
            container_width: container,
        }
    }

    /// Wrapper width, measured even when the carousel is hidden.
    fn container_width(&mut self) -> f32 {
        if let Some(hidden) = self.doc.closest(self.wrapper, SR_ONLY) {
            self.doc.remove_class(hidden, SR_ONLY);
            let width = self.doc.offset_width(self.wrapper);
            self.doc.add_class(hidden, SR_ONLY);
            return width;
        }
        match self.doc.computed_width(self.wrapper) {
            Some(width) => width,
            None => self.hidden_parent_width(),
        }
    }

    /// Force the nearest hidden ancestor visible just long enough to measure.
    fn hidden_parent_width(&mut self) -> f32 {
        let root = self.doc.root();
        let mut current = self.element;
        while let Some(parent) = self.doc.parent(current) {
            if parent == root {
                break;
            }
            let hidden = self
                .doc
                .computed_style(parent)
                .is_some_and(|style| style.is_hidden());
            if hidden {
                return self.measure_with_visible(parent);
            }
            current = parent;
        }
        0.0
    }

    fn measure_with_visible(&mut self, ancestor: NodeId) -> f32 {
        let saved = self.doc.element(ancestor).map(|el| el.inline);
        self.doc.set_inline(ancestor, |style| {
            style.display = Some(Display::Block);
            style.visibility = Some(Visibility::Visible);
        });
        let width = self.doc.offset_width(self.wrapper);
        if let Some(saved) = saved {
            self.doc.set_inline(ancestor, |style| {
                style.display = saved.display;
                style.visibility = saved.visibility;
            });
        }
        width
    }

    /// Push the current layout into inline styles.
    pub(super) fn apply_layout(&mut self) {
        let width = self.layout.item_width;
        let mut nodes = self.track();
        nodes.extend(self.originals.iter().copied());
        for node in nodes {
            self.doc.set_inline(node, |style| style.width = Some(width));
        }
        if !self.platform.flexbox {
            let track_width = self.layout.step() * self.layout.visible as f32 * 3.0;
            self.doc
                .set_inline(self.list, |style| style.width = Some(track_width));
        }
    }

    /// Re-measure after a resize and bring the track in line with the new
    /// window size.
    pub(super) fn relayout(&mut self) {
        let before = self.layout;
        let was_active = self.is_active();

        if self.platform.custom_properties {
            if let Some(first) = self.track().first().copied() {
                self.doc.set_inline(first, |style| style.width = None);
            }
        }
        self.layout = self.measure();
        self.apply_layout();
        let now_active = self.is_active();

        if self.loops() {
            match (was_active, now_active) {
                (true, true) => {
                    let (old, new) = (before.visible, self.layout.visible);
                    if old > new {
                        self.remove_slots(0, old - new);
                    } else if old < new {
                        self.prepend_slots(old, new);
                    }
                    self.normalize_trailing();
                }
                (false, true) => {
                    self.selected = 0;
                    self.fill_buffer();
                }
                (true, false) => {
                    self.selected = 0;
                    self.reset_track();
                }
                (false, false) => {}
            }
        } else if now_active {
            self.selected = self
                .selected
                .min(self.item_count() - self.layout.visible);
        } else {
            self.selected = 0;
        }

        let rest = self.rest_translate();
        self.set_translate(rest);
        self.refresh_tab_indices();
        tracing::debug!(
            visible = self.layout.visible,
            item_width = self.layout.item_width,
            previous_visible = before.visible,
            "carousel relayout"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::markup::CarouselMarkup;
    use crate::carousel::CarouselConfig;
    use reel_core::dom::{Document, Style};
    use reel_core::Platform;

    #[test]
    fn fit_fills_container_exactly() {
        assert_eq!(fit(920.0, 0.0, 10.0, 300.0), (3, 300.0));
        // (1000 + 10) / 310 = 3.25 -> 3 items of 1010/3 - 10
        assert_eq!(fit(1000.0, 0.0, 10.0, 300.0), (3, 326.7));
        assert_eq!(fit(500.0, 20.0, 0.0, 100.0), (4, 115.0));
    }

    #[test]
    fn fit_never_goes_below_one_item() {
        assert_eq!(fit(200.0, 0.0, 10.0, 300.0).0, 1);
        assert_eq!(fit(0.0, 0.0, 0.0, 0.0), (1, 0.0));
        assert_eq!(fit(100.0, 80.0, 0.0, 50.0), (1, 0.0));
    }

    #[test]
    fn layout_steps() {
        let layout = Layout {
            visible: 3,
            item_width: 300.0,
            margin: 10.0,
            container_width: 920.0,
        };
        assert_eq!(layout.step(), 310.0);
        assert_eq!(layout.window_translate(), -930.0);
    }

    #[test]
    fn natural_width_is_capped_by_container() {
        let mut doc = Document::new(250.0);
        let nodes = CarouselMarkup::new(4).item_width(400.0).build(&mut doc);
        let carousel = Carousel::new(doc, nodes.element, CarouselConfig::default(), Platform::immediate())
            .expect("valid markup");
        assert_eq!(carousel.visible_count(), 1);
        assert_eq!(carousel.item_width(), 250.0);
    }

    #[test]
    fn measures_inside_display_none_ancestor() {
        let mut doc = Document::new(920.0);
        let section = doc.create_element("section");
        let root = doc.root();
        doc.append_child(root, section);
        doc.set_sheet_style(section, Style::default().with_display(Display::None));
        let nodes = CarouselMarkup::new(6).mount(section).build(&mut doc);

        let carousel = Carousel::new(doc, nodes.element, CarouselConfig::default(), Platform::immediate())
            .expect("valid markup");
        assert_eq!(carousel.visible_count(), 3);
        assert_eq!(carousel.layout().container_width, 920.0);
        // The override is gone afterwards.
        let style = carousel.document().computed_style(section).expect("element");
        assert_eq!(style.display, Display::None);
    }

    #[test]
    fn measures_inside_sr_only_ancestor() {
        let mut doc = Document::new(920.0);
        let section = doc.create_element_with_classes("section", &[SR_ONLY]);
        let root = doc.root();
        doc.append_child(root, section);
        let nodes = CarouselMarkup::new(6).mount(section).build(&mut doc);

        let carousel = Carousel::new(doc, nodes.element, CarouselConfig::default(), Platform::immediate())
            .expect("valid markup");
        assert_eq!(carousel.visible_count(), 3);
        assert!(carousel.document().has_class(section, SR_ONLY));
    }

    #[test]
    fn flexbox_fallback_sizes_the_track() {
        let mut doc = Document::new(920.0);
        let nodes = CarouselMarkup::new(6).build(&mut doc);
        let platform = Platform {
            flexbox: false,
            ..Platform::immediate()
        };
        let carousel =
            Carousel::new(doc, nodes.element, CarouselConfig::default(), platform).expect("valid markup");
        let list = carousel.document().computed_style(nodes.list).expect("element");
        assert_eq!(list.width, Some(310.0 * 3.0 * 3.0));
    }
}
