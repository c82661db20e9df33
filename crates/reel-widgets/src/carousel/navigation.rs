//! Paging, transition completion, drag and click handling.

use super::{
    Carousel, Message, Motion, Phase, ANIMATING_CLASS, CONTROL_CLASS, DRAGGING_CLASS,
    NAVIGATION_CLASS, NAV_ITEM_CLASS,
};
use crate::gesture::{GestureEvent, GestureKind};
use reel_core::dom::NodeId;
use reel_core::Command;
use std::time::Instant;

/// Drags shorter than this leave the track where it is.
pub const DRAG_DEAD_ZONE: i32 = 10;

/// Drags longer than this page when released.
pub const DRAG_PAGE_THRESHOLD: i32 = 40;

impl Carousel {
    /// Start moving the track. Completion is immediate when there is nothing
    /// to animate, otherwise it waits for [`Message::TransitionEnd`].
    pub(super) fn navigate(&mut self, motion: Motion) -> Command<Message> {
        if !self.is_active() {
            return Command::none();
        }
        if self.is_animating() {
            tracing::trace!(?motion, "transition in flight, dropped");
            return Command::none();
        }

        let from = self.translate;
        let target = if self.loops() {
            self.loop_target(motion)
        } else {
            let last = self.item_count() - self.layout.visible;
            let visible = self.layout.visible;
            let selected = match motion {
                Motion::Next => (self.selected + visible).min(last),
                Motion::Prev => self.selected.saturating_sub(visible),
                Motion::Jump(page) => page.saturating_mul(visible).min(last),
                Motion::Settle => self.selected,
            };
            let target = -(selected as f32) * self.layout.step();
            // A drag past either end still has to come back to rest.
            if selected == self.selected && motion != Motion::Settle && from == target {
                return Command::none();
            }
            self.selected = selected;
            target
        };

        let token = self.token();
        self.phase = Phase::Animating {
            token,
            motion,
            from,
            started: Instant::now(),
        };
        self.pause_autoplay();
        self.doc.add_class(self.list, ANIMATING_CLASS);
        self.set_translate(target);
        self.reset_controls();
        self.update_counter();

        match self.platform.transition {
            Some(duration) if from != target => {
                Command::tick(duration, move |_| Message::TransitionEnd(token))
            }
            _ => {
                self.complete();
                Command::none()
            }
        }
    }

    /// New selection and target offset for a loop buffer.
    fn loop_target(&mut self, motion: Motion) -> f32 {
        let visible = self.layout.visible as isize;
        let window = self.layout.window_translate();
        match motion {
            Motion::Next => {
                self.selected = self.wrap(self.selected as isize + visible);
                2.0 * window
            }
            Motion::Prev => {
                self.selected = self.wrap(self.selected as isize - visible);
                0.0
            }
            Motion::Jump(page) => {
                self.selected = self.wrap(page as isize * visible);
                self.fill_buffer();
                window
            }
            Motion::Settle => window,
        }
    }

    pub(super) fn transition_end(&mut self, token: u64) -> Command<Message> {
        match self.phase {
            Phase::Animating { token: current, .. } if current == token => self.complete(),
            _ => tracing::trace!(token, "stale transition end"),
        }
        Command::none()
    }

    fn complete(&mut self) {
        let Phase::Animating { motion, .. } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return;
        };
        self.doc.remove_class(self.list, ANIMATING_CLASS);
        if self.loops() && self.is_active() {
            match motion {
                Motion::Next => self.shift_forward(),
                Motion::Prev => self.shift_backward(),
                Motion::Jump(_) | Motion::Settle => {}
            }
            let rest = self.layout.window_translate();
            self.set_translate(rest);
        }
        self.refresh_tab_indices();
        self.reset_controls();
        self.update_counter();
        self.announce();
        self.start_autoplay();
        tracing::debug!(selected = self.selected, ?motion, "carousel settled");
    }

    pub(super) fn on_gesture(&mut self, event: GestureEvent) -> Command<Message> {
        match event.kind {
            GestureKind::DragStart => self.drag_start(event.x, event.origin),
            GestureKind::Dragging => self.drag_move(event.x),
            GestureKind::DragEnd => return self.drag_end(event.x),
            // The release decides on its own.
            GestureKind::SwipeLeft
            | GestureKind::SwipeRight
            | GestureKind::SwipeUp
            | GestureKind::SwipeDown => {}
        }
        Command::none()
    }

    fn drag_start(&mut self, x: i32, origin: Option<NodeId>) {
        if let Some(origin) = origin {
            let on_control = self.doc.closest(origin, CONTROL_CLASS).is_some()
                || self.doc.closest(origin, NAVIGATION_CLASS).is_some();
            if on_control || !self.doc.contains(self.wrapper, origin) {
                return;
            }
        }
        self.doc.add_class(self.element, DRAGGING_CLASS);
        self.pause_autoplay();
        self.drag_origin = Some(x);
    }

    fn drag_move(&mut self, x: i32) {
        let Some(origin) = self.drag_origin else {
            return;
        };
        if self.is_animating() || !self.is_active() {
            return;
        }
        let dx = x - origin;
        if dx.abs() < DRAG_DEAD_ZONE {
            return;
        }
        let offset = self.rest_translate() + dx as f32;
        self.set_translate(offset);
    }

    fn drag_end(&mut self, x: i32) -> Command<Message> {
        let Some(origin) = self.drag_origin.take() else {
            return Command::none();
        };
        self.doc.remove_class(self.element, DRAGGING_CLASS);
        let dx = x - origin;
        let at_rest = self.translate == self.rest_translate();
        if !self.is_active() || (dx == 0 && at_rest) {
            self.start_autoplay();
            return Command::none();
        }
        let cmd = if dx < -DRAG_PAGE_THRESHOLD {
            self.navigate(Motion::Next)
        } else if dx > DRAG_PAGE_THRESHOLD {
            self.navigate(Motion::Prev)
        } else {
            self.navigate(Motion::Settle)
        };
        if !self.is_animating() {
            self.start_autoplay();
        }
        cmd
    }

    pub(super) fn click(&mut self, target: NodeId) -> Command<Message> {
        if let Some((prev, next)) = self.controls {
            if let Some(control) = self.doc.closest(target, CONTROL_CLASS) {
                if self.doc.attribute(control, "disabled").is_some() {
                    return Command::none();
                }
                if control == prev {
                    return self.navigate(Motion::Prev);
                }
                if control == next {
                    return self.navigate(Motion::Next);
                }
            }
        }
        let page = self
            .doc
            .closest(target, NAV_ITEM_CLASS)
            .and_then(|dot| self.dots().iter().position(|candidate| *candidate == dot));
        match page {
            Some(page) => self.navigate(Motion::Jump(page)),
            None => Command::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::markup::{CarouselMarkup, CarouselNodes};
    use crate::carousel::CarouselConfig;
    use crate::gesture::{self, Phase as PointerPhase, PointerInput};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use reel_core::dom::Document;
    use reel_core::testing::TestComponent;
    use reel_core::{Component, Platform};
    use std::time::Duration;

    fn build(
        items: usize,
        viewport: f32,
        config: CarouselConfig,
        platform: Platform,
    ) -> (Carousel, CarouselNodes) {
        let mut doc = Document::new(viewport);
        let nodes = CarouselMarkup::new(items).build(&mut doc);
        let carousel = Carousel::new(doc, nodes.element, config, platform).expect("valid markup");
        (carousel, nodes)
    }

    fn pointer(phase: PointerPhase, x: f32, target: NodeId) -> Message {
        Message::Pointer(PointerInput::mouse(phase, x, 40.0).with_target(target))
    }

    fn drag(harness: &mut TestComponent<Carousel>, target: NodeId, from: f32, to: f32) {
        harness.send(pointer(PointerPhase::Down, from, target));
        harness.send(pointer(PointerPhase::Move, to, target));
        harness.send(pointer(PointerPhase::Up, to, target));
    }

    #[tokio::test(start_paused = true)]
    async fn paging_is_ignored_while_animating() {
        let (carousel, nodes) = build(10, 920.0, CarouselConfig::default(), Platform::default());
        let mut harness = TestComponent::new(carousel);

        harness.send(Message::Next);
        assert!(harness.component().is_animating());
        assert_eq!(harness.component().selected_index(), 3);
        assert_eq!(harness.pending(), 1);

        harness.send(Message::Next);
        harness.send(Message::Prev);
        harness.send(Message::JumpToPage(2));
        assert_eq!(harness.component().selected_index(), 3);
        assert_eq!(harness.pending(), 1);

        harness.settle().await;
        let carousel = harness.component();
        assert!(!carousel.is_animating());
        assert_eq!(carousel.selected_index(), 3);
        assert_eq!(carousel.translate(), -930.0);
        assert!(!carousel.document().has_class(nodes.list, ANIMATING_CLASS));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_transition_end_is_ignored() {
        let (mut carousel, _) = build(10, 920.0, CarouselConfig::default(), Platform::default());
        let _ = carousel.update(Message::Next);
        assert!(carousel.is_animating());
        let _ = carousel.update(Message::TransitionEnd(999));
        assert!(carousel.is_animating());
        // Mid-transition the track sits two windows in.
        assert_eq!(carousel.translate(), -1860.0);
    }

    #[test]
    fn next_then_prev_restores_the_track() {
        let (mut carousel, _) = build(8, 920.0, CarouselConfig::default(), Platform::immediate());
        let track = carousel.track();
        let indices = |c: &Carousel| -> Vec<_> {
            c.track().into_iter().filter_map(|node| c.item_index(node)).collect()
        };
        let before = indices(&carousel);

        let _ = carousel.update(Message::Next);
        assert_eq!(carousel.selected_index(), 3);
        let _ = carousel.update(Message::Prev);
        assert_eq!(carousel.selected_index(), 0);
        assert_eq!(indices(&carousel), before);
        assert_eq!(carousel.translate(), -930.0);
        assert_eq!(carousel.track().len(), track.len());
    }

    #[test]
    fn prev_wraps_around_in_loop_mode() {
        let (mut carousel, _) = build(10, 920.0, CarouselConfig::default(), Platform::immediate());
        let _ = carousel.update(Message::Prev);
        assert_eq!(carousel.selected_index(), 7);
    }

    #[test]
    fn non_loop_stops_at_both_ends() {
        let config = CarouselConfig::default().with_looping(false);
        let (mut carousel, nodes) = build(7, 920.0, config, Platform::immediate());
        let (prev, next) = carousel.controls().expect("controls");

        let _ = carousel.update(Message::Click(prev));
        assert_eq!(carousel.selected_index(), 0);

        let _ = carousel.update(Message::Click(next));
        let _ = carousel.update(Message::Click(next));
        assert_eq!(carousel.selected_index(), 4);
        assert_eq!(carousel.translate(), -4.0 * 310.0);

        // Disabled now; a click does nothing.
        let _ = carousel.update(Message::Click(next));
        assert_eq!(carousel.selected_index(), 4);
        assert!(carousel.clones().is_empty());
        assert_eq!(carousel.track(), nodes.items);
    }

    #[test]
    fn dots_jump_to_clamped_pages() {
        let config = CarouselConfig::default().with_navigation(true);
        let (mut carousel, _) = build(10, 920.0, config, Platform::immediate());
        assert_eq!(carousel.dot_count(), 4);

        let _ = carousel.update(Message::Next);
        assert_eq!(carousel.selected_index(), 3);

        let last = carousel.dots()[3];
        let _ = carousel.update(Message::Click(last));
        assert_eq!(carousel.selected_index(), 7);

        let _ = carousel.update(Message::JumpToPage(1));
        assert_eq!(carousel.selected_index(), 3);
    }

    #[test]
    fn loop_jump_rebuilds_the_buffer() {
        let (mut carousel, _) = build(10, 920.0, CarouselConfig::default(), Platform::immediate());
        let messages = carousel.update(Message::JumpToPage(2)).into_messages();
        assert_eq!(carousel.selected_index(), 6);
        assert_eq!(carousel.translate(), -930.0);
        let first = carousel.track()[0];
        assert_eq!(carousel.item_index(first), Some(3));
        assert!(messages.iter().any(|msg| matches!(msg, Message::Updated(_))));
    }

    #[test]
    fn too_few_items_disable_everything() {
        let (mut carousel, _) = build(5, 1550.0, CarouselConfig::default(), Platform::immediate());
        assert_eq!(carousel.visible_count(), 5);
        assert!(!carousel.is_active());
        assert!(carousel.clones().is_empty());
        assert_eq!(carousel.translate(), 0.0);

        let (prev, next) = carousel.controls().expect("controls");
        assert!(carousel.document().attribute(prev, "disabled").is_some());
        assert!(carousel.document().attribute(next, "disabled").is_some());

        let _ = carousel.update(Message::Next);
        assert_eq!(carousel.selected_index(), 0);

        let config = CarouselConfig::default().with_navigation(true);
        let (carousel, _) = build(5, 1550.0, config, Platform::immediate());
        assert_eq!(carousel.dot_count(), 1);
        let list = carousel
            .document()
            .first_by_class(carousel.element(), NAVIGATION_CLASS)
            .expect("dots");
        assert!(carousel.document().has_class(list, "is-hidden"));

        let config = CarouselConfig::default().with_looping(false);
        let (mut carousel, nodes) = build(5, 1550.0, config, Platform::immediate());
        assert!(!carousel.is_active());
        assert!(carousel.clones().is_empty());
        assert_eq!(carousel.track(), nodes.items);
        let (prev, next) = carousel.controls().expect("controls");
        assert!(carousel.document().attribute(prev, "disabled").is_some());
        assert!(carousel.document().attribute(next, "disabled").is_some());
        let _ = carousel.update(Message::Prev);
        assert_eq!(carousel.selected_index(), 0);
        assert_eq!(carousel.translate(), 0.0);
    }

    #[test]
    fn arrow_keys_page() {
        let (mut carousel, _) = build(10, 920.0, CarouselConfig::default(), Platform::immediate());
        let _ = carousel.update(Message::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)));
        assert_eq!(carousel.selected_index(), 3);
        let _ = carousel.update(Message::Key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE)));
        assert_eq!(carousel.selected_index(), 0);
        let _ = carousel.update(Message::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)));
        assert_eq!(carousel.selected_index(), 0);
    }

    #[test]
    fn long_drags_page() {
        let config = CarouselConfig::default().with_drag(true);
        let (carousel, _) = build(10, 920.0, config, Platform::immediate());
        let item = carousel.track()[4];
        let mut harness = TestComponent::new(carousel);

        drag(&mut harness, item, 500.0, 455.0);
        assert_eq!(harness.component().selected_index(), 3);
        assert!(!harness.component().is_dragging());

        let item = harness.component().track()[4];
        drag(&mut harness, item, 500.0, 545.0);
        assert_eq!(harness.component().selected_index(), 0);
    }

    #[test]
    fn short_drag_settles_back() {
        let config = CarouselConfig::default().with_drag(true);
        let (carousel, nodes) = build(10, 920.0, config, Platform::immediate());
        let item = carousel.track()[4];
        let mut harness = TestComponent::new(carousel);

        harness.send(pointer(PointerPhase::Down, 500.0, item));
        assert!(harness.component().is_dragging());
        assert!(harness.component().document().has_class(nodes.element, DRAGGING_CLASS));
        harness.send(pointer(PointerPhase::Move, 475.0, item));
        assert_eq!(harness.component().translate(), -955.0);

        harness.send(pointer(PointerPhase::Up, 475.0, item));
        let carousel = harness.component();
        assert_eq!(carousel.selected_index(), 0);
        assert_eq!(carousel.translate(), -930.0);
        assert!(!carousel.document().has_class(nodes.element, DRAGGING_CLASS));
    }

    #[test]
    fn non_loop_drags_past_the_ends_spring_back() {
        let config = CarouselConfig::default()
            .with_looping(false)
            .with_drag(true)
            .with_autoplay(Duration::from_secs(3));
        let (carousel, nodes) = build(10, 920.0, config, Platform::immediate());
        let mut harness = TestComponent::new(carousel);

        harness.send(pointer(PointerPhase::Down, 500.0, nodes.items[1]));
        harness.send(pointer(PointerPhase::Move, 545.0, nodes.items[1]));
        assert_eq!(harness.component().translate(), 45.0);
        harness.send(pointer(PointerPhase::Up, 545.0, nodes.items[1]));
        let carousel = harness.component();
        assert_eq!(carousel.selected_index(), 0);
        assert_eq!(carousel.translate(), 0.0);
        assert!(!carousel.is_animating());
        assert!(carousel.is_autoplay_armed());

        for _ in 0..3 {
            harness.send(Message::Next);
        }
        assert_eq!(harness.component().selected_index(), 7);
        drag(&mut harness, nodes.items[8], 500.0, 455.0);
        let carousel = harness.component();
        assert_eq!(carousel.selected_index(), 7);
        assert_eq!(carousel.translate(), -7.0 * 310.0);
        assert!(carousel.is_autoplay_armed());
        let (_, next) = carousel.controls().expect("controls");
        assert!(carousel.document().attribute(next, "disabled").is_some());
    }

    #[test]
    fn drag_back_to_its_origin_returns_to_rest() {
        let config = CarouselConfig::default().with_drag(true);
        let (carousel, _) = build(10, 920.0, config, Platform::immediate());
        let item = carousel.track()[4];
        let mut harness = TestComponent::new(carousel);

        harness.send(pointer(PointerPhase::Down, 500.0, item));
        harness.send(pointer(PointerPhase::Move, 560.0, item));
        assert_eq!(harness.component().translate(), -870.0);
        harness.send(pointer(PointerPhase::Move, 500.0, item));
        harness.send(pointer(PointerPhase::Up, 500.0, item));
        let carousel = harness.component();
        assert_eq!(carousel.selected_index(), 0);
        assert_eq!(carousel.translate(), -930.0);
        assert!(!carousel.is_animating());
    }

    #[test]
    fn tiny_moves_stay_in_the_dead_zone() {
        let config = CarouselConfig::default().with_drag(true);
        let (carousel, _) = build(10, 920.0, config, Platform::immediate());
        let item = carousel.track()[4];
        let mut harness = TestComponent::new(carousel);

        harness.send(pointer(PointerPhase::Down, 500.0, item));
        harness.send(pointer(PointerPhase::Move, 494.0, item));
        assert_eq!(harness.component().translate(), -930.0);
    }

    #[test]
    fn click_without_travel_restarts_autoplay() {
        let config = CarouselConfig::default()
            .with_drag(true)
            .with_autoplay(Duration::from_secs(3));
        let (carousel, _) = build(10, 920.0, config, Platform::immediate());
        let item = carousel.track()[4];
        let mut harness = TestComponent::new(carousel);

        harness.send(pointer(PointerPhase::Down, 500.0, item));
        assert!(!harness.component().is_autoplay_armed());
        harness.send(pointer(PointerPhase::Up, 500.0, item));
        assert!(harness.component().is_autoplay_armed());
        assert_eq!(harness.component().selected_index(), 0);
    }

    #[test]
    fn presses_on_controls_do_not_drag() {
        let config = CarouselConfig::default().with_drag(true);
        let (carousel, nodes) = build(10, 920.0, config, Platform::immediate());
        let mut harness = TestComponent::new(carousel);
        let prev = nodes.prev.expect("prev");

        harness.send(pointer(PointerPhase::Down, 5.0, prev));
        assert!(!harness.component().is_dragging());
        harness.send(pointer(PointerPhase::Up, 100.0, prev));
        assert_eq!(harness.component().selected_index(), 0);
    }

    #[test]
    fn pointer_input_is_ignored_without_drag() {
        let (carousel, _) = build(10, 920.0, CarouselConfig::default(), Platform::immediate());
        let item = carousel.track()[4];
        let mut harness = TestComponent::new(carousel);
        drag(&mut harness, item, 500.0, 400.0);
        assert_eq!(harness.component().selected_index(), 0);
        assert!(!harness
            .history()
            .iter()
            .any(|msg| matches!(msg, Message::Gesture(gesture::Message::Emitted(_)))));
    }
}
