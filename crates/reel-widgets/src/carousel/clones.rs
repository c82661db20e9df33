//! The loop buffer.
//!
//! In loop mode an active carousel keeps exactly `3 * visible` slots in the
//! track at rest: one window before the visible one, the visible window, and
//! one after. Slot `k` always shows item `(selected - visible + k) mod n`.
//! Originals that fall out of the buffer are detached and kept around as
//! clone sources; clones that fall out are destroyed.

use super::Carousel;
use reel_core::dom::NodeId;

impl Carousel {
    /// Deep copy of original `item`, remembered as a clone.
    fn make_clone(&mut self, item: usize) -> Option<NodeId> {
        let original = *self.originals.get(item)?;
        let copy = self.doc.clone_node(original)?;
        self.clone_origin.insert(copy, item);
        Some(copy)
    }

    /// Take a node out of the track.
    fn discard(&mut self, node: NodeId) {
        if self.clone_origin.remove(&node).is_some() {
            self.doc.remove(node);
        } else {
            self.doc.detach(node);
        }
    }

    /// Remove up to `count` slots starting at `index`.
    pub(super) fn remove_slots(&mut self, index: usize, count: usize) {
        for _ in 0..count {
            let Some(node) = self.track().get(index).copied() else {
                break;
            };
            self.discard(node);
        }
    }

    /// Put clones of items `selected - to .. selected - from` in front of the
    /// track, in item order.
    pub(super) fn prepend_slots(&mut self, from: usize, to: usize) {
        let selected = self.selected as isize;
        let items: Vec<usize> = (from..to)
            .rev()
            .map(|i| self.wrap(selected - i as isize - 1))
            .collect();
        let anchor = self.doc.children(self.list).first().copied();
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let Some(copy) = self.make_clone(item) else {
                continue;
            };
            match anchor {
                Some(anchor) => self.doc.insert_before(anchor, copy),
                None => self.doc.append_child(self.list, copy),
            }
            inserted.push(copy);
        }
        self.report(inserted);
    }

    /// Append clones until the track has `slots` slots.
    fn append_slots(&mut self, slots: usize) {
        let start = self.track().len();
        let base = self.selected as isize - self.layout.visible as isize;
        let mut inserted = Vec::with_capacity(slots.saturating_sub(start));
        for slot in start..slots {
            let item = self.wrap(base + slot as isize);
            let Some(copy) = self.make_clone(item) else {
                continue;
            };
            self.doc.append_child(self.list, copy);
            inserted.push(copy);
        }
        self.report(inserted);
    }

    /// Grow or trim the tail so the track has exactly three windows.
    pub(super) fn normalize_trailing(&mut self) {
        let slots = 3 * self.layout.visible;
        let len = self.track().len();
        if len < slots {
            self.append_slots(slots);
        } else if len > slots {
            self.remove_slots(slots, len - slots);
        }
    }

    /// After paging forward: drop the window that scrolled out on the left
    /// and refill on the right. `selected` is already updated.
    pub(super) fn shift_forward(&mut self) {
        self.remove_slots(0, self.layout.visible);
        self.normalize_trailing();
    }

    /// After paging back: drop the rightmost window and refill on the left.
    pub(super) fn shift_backward(&mut self) {
        let visible = self.layout.visible;
        self.remove_slots(2 * visible, visible);
        self.prepend_slots(0, visible);
    }

    /// Rebuild the whole buffer around `selected`. The leading window is
    /// always cloned; later slots reuse an original the first time it comes up.
    pub(super) fn fill_buffer(&mut self) {
        for node in self.track() {
            self.discard(node);
        }
        let visible = self.layout.visible;
        let base = self.selected as isize - visible as isize;
        let mut placed = vec![false; self.item_count()];
        let mut inserted = Vec::new();
        for slot in 0..3 * visible {
            let item = self.wrap(base + slot as isize);
            let node = if slot >= visible && !placed[item] {
                placed[item] = true;
                self.originals[item]
            } else {
                match self.make_clone(item) {
                    Some(copy) => {
                        inserted.push(copy);
                        copy
                    }
                    None => continue,
                }
            };
            self.doc.append_child(self.list, node);
        }
        self.report(inserted);
    }

    /// Drop every clone and put the originals back in order.
    pub(super) fn reset_track(&mut self) {
        for node in self.track() {
            self.discard(node);
        }
        for node in self.originals.clone() {
            self.doc.append_child(self.list, node);
        }
    }

    fn report(&mut self, inserted: Vec<NodeId>) {
        if inserted.is_empty() {
            return;
        }
        tracing::trace!(count = inserted.len(), "clones inserted");
        self.outbox.push(inserted);
    }
}

#[cfg(test)]
mod tests {
    use crate::carousel::markup::CarouselMarkup;
    use crate::carousel::{Carousel, CarouselConfig, Message};
    use reel_core::dom::Document;
    use reel_core::{Component, Platform};

    fn carousel(items: usize, viewport: f32) -> Carousel {
        let mut doc = Document::new(viewport);
        let nodes = CarouselMarkup::new(items).build(&mut doc);
        Carousel::new(doc, nodes.element, CarouselConfig::default(), Platform::immediate())
            .expect("valid markup")
    }

    fn buffer(carousel: &Carousel) -> Vec<usize> {
        carousel
            .track()
            .into_iter()
            .filter_map(|node| carousel.item_index(node))
            .collect()
    }

    fn expected(selected: usize, visible: usize, n: usize) -> Vec<usize> {
        (0..3 * visible)
            .map(|k| (selected + n * visible + k - visible) % n)
            .collect()
    }

    #[test]
    fn initial_buffer_has_three_windows() {
        let carousel = carousel(10, 920.0);
        assert_eq!(carousel.visible_count(), 3);
        assert_eq!(buffer(&carousel), vec![7, 8, 9, 0, 1, 2, 3, 4, 5]);
        // Leading window is cloned, the rest are originals.
        assert_eq!(carousel.clones().len(), 3);
        assert_eq!(carousel.translate(), -930.0);
    }

    #[test]
    fn short_lists_wrap_into_trailing_clones() {
        let carousel = carousel(4, 920.0);
        assert_eq!(buffer(&carousel), vec![1, 2, 3, 0, 1, 2, 3, 0, 1]);
        assert_eq!(carousel.clones().len(), 5);
    }

    #[test]
    fn buffer_tracks_selection_through_any_sequence() {
        let mut carousel = carousel(7, 920.0);
        let n = carousel.item_count();
        let v = carousel.visible_count();
        let moves = [true, true, false, true, true, true, false, false, false, false, true];
        for forward in moves {
            let msg = if forward { Message::Next } else { Message::Prev };
            let _ = carousel.update(msg);
            assert!(carousel.selected_index() < n);
            assert_eq!(buffer(&carousel), expected(carousel.selected_index(), v, n));
            assert_eq!(carousel.track().len(), 3 * v);
            assert_eq!(carousel.translate(), carousel.layout().window_translate());
        }
    }

    #[test]
    fn detached_originals_are_reused_as_clone_sources() {
        let mut doc = Document::new(920.0);
        let nodes = CarouselMarkup::new(10).build(&mut doc);
        let mut carousel =
            Carousel::new(doc, nodes.element, CarouselConfig::default(), Platform::immediate())
                .expect("valid markup");
        for _ in 0..4 {
            let _ = carousel.update(Message::Next);
        }
        // 4 pages of 3 on 10 items: selected = 12 mod 10.
        assert_eq!(carousel.selected_index(), 2);
        assert_eq!(buffer(&carousel), expected(2, 3, 10));
        assert_eq!(carousel.clones().len(), 9);

        let doc = carousel.document();
        assert!(nodes
            .items
            .iter()
            .all(|item| doc.exists(*item) && !doc.is_connected(*item)));
    }

    #[test]
    fn every_insertion_is_reported() {
        let mut carousel = carousel(10, 920.0);
        let initial = carousel.take_updates().into_messages();
        assert!(matches!(initial.as_slice(), [Message::Updated(clones)] if clones.len() == 3));

        let messages = carousel.update(Message::Next).into_messages();
        let updated: Vec<_> = messages
            .iter()
            .filter_map(|msg| match msg {
                Message::Updated(clones) => Some(clones.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(updated.len(), 1);
        let indices: Vec<_> = updated[0]
            .iter()
            .filter_map(|node| carousel.item_index(*node))
            .collect();
        assert_eq!(indices, vec![6, 7, 8]);
    }
}
