//! Everything derived from the window: tab order, controls, dots, counter,
//! the live region, centering and control alignment.

use super::{
    Carousel, Navigation, JUSTIFY_CLASS, LIVE_REGION_CLASS, NAVIGATION_CLASS, NAV_ITEM_CLASS,
};
use reel_core::dom::{NodeId, SR_ONLY};

const TABINDEX: &str = "tabindex";
const DISABLED: &str = "disabled";

impl Carousel {
    /// Items outside the visible window leave the tab order.
    pub(super) fn refresh_tab_indices(&mut self) {
        let track = self.track();
        let visible = self.layout.visible;
        let active = self.is_active();
        let mut first_reachable = track.len();
        for (slot, node) in track.iter().enumerate() {
            let hidden = active
                && if self.loops() {
                    slot < visible || slot >= 2 * visible
                } else {
                    slot < self.selected || slot >= self.selected + visible
                };
            if hidden {
                self.doc.set_attribute(*node, TABINDEX, "-1");
            } else {
                first_reachable = first_reachable.min(slot);
                self.doc.remove_attribute(*node, TABINDEX);
            }
        }
        if self.config.overflow_items {
            self.reveal_overflow(&track, first_reachable);
        }
    }

    /// Partially visible items on both sides of the window stay reachable.
    fn reveal_overflow(&mut self, track: &[NodeId], first: usize) {
        let step = self.layout.step();
        if step <= 0.0 {
            return;
        }
        let visible = self.layout.visible;
        let spare = (self.doc.viewport_width() - step * visible as f32) / 2.0;
        let count = (spare / step).ceil();
        if count <= 0.0 {
            return;
        }
        for i in 0..count as usize {
            if let Some(before) = first.checked_sub(i + 1).and_then(|slot| track.get(slot)) {
                self.doc.remove_attribute(*before, TABINDEX);
            }
            if let Some(after) = track.get(first + visible + i) {
                self.doc.remove_attribute(*after, TABINDEX);
            }
        }
    }

    /// Enable or disable previous/next and move the selected dot.
    pub(super) fn reset_controls(&mut self) {
        if let Some((prev, next)) = self.controls {
            let active = self.is_active();
            let (prev_off, next_off) = if self.loops() {
                (!active, !active)
            } else {
                let last = self.item_count().saturating_sub(self.layout.visible);
                (self.selected == 0, !active || self.selected >= last)
            };
            self.set_disabled(prev, prev_off);
            self.set_disabled(next, next_off);
        }

        let Some(dots) = self.navigation.as_ref().map(|nav| nav.dots.clone()) else {
            return;
        };
        let selected_class = format!("{}--selected", self.config.navigation_item_class);
        let selected = self.selected_dot(dots.len());
        for (index, dot) in dots.iter().enumerate() {
            self.doc.toggle_class(*dot, &selected_class, index == selected);
        }
    }

    fn set_disabled(&mut self, control: NodeId, disabled: bool) {
        if disabled {
            self.doc.set_attribute(control, DISABLED, "true");
        } else {
            self.doc.remove_attribute(control, DISABLED);
        }
    }

    /// Page containing `selected`; the last page once the track is at its end.
    fn selected_dot(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let visible = self.layout.visible;
        let at_end = !self.loops()
            && self.is_active()
            && self.selected >= self.item_count() - visible;
        let page = if at_end {
            count - 1
        } else {
            self.selected.div_ceil(visible)
        };
        page.min(count - 1)
    }

    pub(super) fn dot_total(&self) -> usize {
        self.item_count().div_ceil(self.layout.visible.max(1))
    }

    /// Append the dot list to the carousel element.
    pub(super) fn build_navigation(&mut self) {
        if !self.config.navigation {
            return;
        }
        let count = self.dot_total();
        let mut list_classes = vec![self.config.navigation_class.as_str(), NAVIGATION_CLASS];
        if !self.is_active() {
            list_classes.push("is-hidden");
        }
        let list = self.doc.create_element_with_classes("ol", &list_classes);

        let item_class = self.config.navigation_item_class.clone();
        let selected_class = format!("{item_class}--selected");
        let selected = self.selected_dot(count);
        let label_classes: &[&str] = if self.config.navigation_pagination {
            &[]
        } else {
            &[SR_ONLY]
        };

        let mut dots = Vec::with_capacity(count);
        for page in 0..count {
            let classes = if page == selected {
                vec![item_class.as_str(), selected_class.as_str(), NAV_ITEM_CLASS]
            } else {
                vec![item_class.as_str(), NAV_ITEM_CLASS]
            };
            let dot = self.doc.create_element_with_classes("li", &classes);
            let button = self
                .doc
                .create_element_with_classes("button", &["reset", "js-tab-focus"]);
            let label = self.doc.create_element_with_classes("span", label_classes);
            let number = self.doc.create_text(&(page + 1).to_string());
            self.doc.append_child(label, number);
            self.doc.append_child(button, label);
            self.doc.append_child(dot, button);
            self.doc.append_child(list, dot);
            dots.push(dot);
        }
        self.doc.append_child(self.element, list);
        self.navigation = Some(Navigation { list, dots });
    }

    pub(super) fn rebuild_navigation(&mut self) {
        if let Some(old) = self.navigation.take() {
            self.doc.remove(old.list);
        }
        self.build_navigation();
    }

    pub(super) fn init_counter(&mut self) {
        if let Some(total) = self.counter_total {
            let text = self.item_count().to_string();
            self.doc.set_text_content(total, &text);
        }
        self.update_counter();
    }

    /// Number of the last visible item.
    pub(super) fn update_counter(&mut self) {
        if let Some(counter) = self.counter {
            let last = (self.selected + self.layout.visible).min(self.item_count());
            self.doc.set_text_content(counter, &last.to_string());
        }
    }

    pub(super) fn create_live_region(&mut self) {
        if !self.config.aria_live {
            return;
        }
        let region = self
            .doc
            .create_element_with_classes("div", &[SR_ONLY, LIVE_REGION_CLASS]);
        self.doc.set_attribute(region, "aria-live", "polite");
        self.doc.set_attribute(region, "aria-atomic", "true");
        self.doc.append_child(self.element, region);
        self.live_region = Some(region);
    }

    pub(super) fn announce(&mut self) {
        if let Some(region) = self.live_region {
            let text = format!(
                "Item {} selected. {} items of {} visible",
                self.selected + 1,
                self.layout.visible,
                self.item_count()
            );
            self.doc.set_text_content(region, &text);
        }
    }

    pub(super) fn center_items(&mut self) {
        if self.config.justify_content {
            let few = self.item_count() < self.layout.visible;
            self.doc.toggle_class(self.list, JUSTIFY_CLASS, few);
        }
    }

    /// Lift the controls so they line up with the bottom of the aligned
    /// element.
    pub(super) fn align_controls(&mut self) {
        let (Some((prev, next)), Some(class)) =
            (self.controls, self.config.align_controls.as_deref())
        else {
            return;
        };
        if self.align_target.is_none() {
            self.align_target = self.doc.first_by_class(self.element, class);
        }
        let Some(target) = self.align_target else {
            return;
        };
        let offset = self.doc.offset_height(self.element) - self.doc.offset_height(target);
        for control in [prev, next] {
            self.doc
                .set_inline(control, |style| style.margin_bottom = Some(offset));
        }
    }
}
