//! Pointer gesture recognition for a single element.
//!
//! [`GestureSource`] turns raw pointer input (mouse or touch) into a small
//! vocabulary: `DragStart`, rate-limited `Dragging`, `DragEnd`, and the four
//! swipe directions. It has two states, idle and dragging. Recognised
//! gestures come out as [`Message::Emitted`] so an embedding widget sees them
//! flow back through its own `update`.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::Frame;
use reel_core::dom::NodeId;
use reel_core::{Command, Component, Platform};
use std::time::Duration;

/// Minimum travel, in px, for a release to count as a swipe.
pub const SWIPE_THRESHOLD: i32 = 30;

/// Where in a press/move/release cycle an input sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Mouse button pressed or touch started.
    Down,
    /// Pointer moved.
    Move,
    /// Mouse button released or touch ended.
    Up,
    /// Pointer left the element.
    Leave,
}

/// The device-specific part of a pointer input.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSource {
    Mouse { x: f32, y: f32 },
    /// Points that changed in this touch event. Only the first one counts.
    Touch { changed_touches: Vec<(f32, f32)> },
}

/// One raw pointer event.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerInput {
    pub phase: Phase,
    pub source: PointerSource,
    /// The node under the pointer, if the host knows it.
    pub target: Option<NodeId>,
}

impl PointerInput {
    pub fn mouse(phase: Phase, x: f32, y: f32) -> Self {
        Self {
            phase,
            source: PointerSource::Mouse { x, y },
            target: None,
        }
    }

    pub fn touch(phase: Phase, changed_touches: Vec<(f32, f32)>) -> Self {
        Self {
            phase,
            source: PointerSource::Touch { changed_touches },
            target: None,
        }
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Mouse and touch in one coordinate model, truncated to whole px.
    /// `None` for a touch event without changed touches.
    pub fn point(&self) -> Option<(i32, i32)> {
        let (x, y) = match &self.source {
            PointerSource::Mouse { x, y } => (*x, *y),
            PointerSource::Touch { changed_touches } => *changed_touches.first()?,
        };
        Some((x as i32, y as i32))
    }

    /// Convert a terminal mouse event. `cell` is the size of one terminal
    /// cell in px (width, height). Only left-button presses, drags, releases
    /// and plain moves are pointer input; everything else yields `None`.
    pub fn from_mouse(event: &MouseEvent, cell: (f32, f32), target: Option<NodeId>) -> Option<Self> {
        let phase = match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Phase::Down,
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => Phase::Move,
            MouseEventKind::Up(MouseButton::Left) => Phase::Up,
            _ => return None,
        };
        Some(Self {
            phase,
            source: PointerSource::Mouse {
                x: f32::from(event.column) * cell.0,
                y: f32::from(event.row) * cell.1,
            },
            target,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    DragStart,
    Dragging,
    DragEnd,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}

/// A recognised gesture. `origin` is only set on `DragStart`: it is the
/// node the press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub x: i32,
    pub y: i32,
    pub origin: Option<NodeId>,
}

impl GestureEvent {
    fn at(kind: GestureKind, (x, y): (i32, i32)) -> Self {
        Self {
            kind,
            x,
            y,
            origin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Raw input from the host.
    Input(PointerInput),
    /// A scheduled animation frame arrived.
    Frame(u64),
    /// A gesture was recognised. Passes through `update` untouched.
    Emitted(GestureEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Dragging { origin: (i32, i32) },
}

/// Gesture detector for one element.
#[derive(Debug)]
pub struct GestureSource {
    state: State,
    frame: Option<Duration>,
    latest: (i32, i32),
    pending_frame: Option<u64>,
    next_token: u64,
}

impl GestureSource {
    /// A detector that coalesces moves to `platform.animation_frame`. Without
    /// frame support every move is reported right away.
    pub fn new(platform: &Platform) -> Self {
        Self {
            state: State::Idle,
            frame: platform.animation_frame,
            latest: (0, 0),
            pending_frame: None,
            next_token: 0,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging { .. })
    }

    fn press(&mut self, point: (i32, i32), target: Option<NodeId>) -> Command<Message> {
        self.state = State::Dragging { origin: point };
        self.latest = point;
        self.pending_frame = None;
        tracing::trace!(x = point.0, y = point.1, "drag start");
        emit(GestureEvent {
            origin: target,
            ..GestureEvent::at(GestureKind::DragStart, point)
        })
    }

    fn track(&mut self, point: (i32, i32)) -> Command<Message> {
        self.latest = point;
        let Some(frame) = self.frame else {
            return emit(GestureEvent::at(GestureKind::Dragging, point));
        };
        if self.pending_frame.is_some() {
            // Coalesced: the pending frame will report the latest point.
            return Command::none();
        }
        self.next_token += 1;
        let token = self.next_token;
        self.pending_frame = Some(token);
        Command::tick(frame, move |_| Message::Frame(token))
    }

    fn release(&mut self, origin: (i32, i32), end: (i32, i32)) -> Command<Message> {
        self.state = State::Idle;
        self.pending_frame = None;

        let dx = end.0 - origin.0;
        let dy = end.1 - origin.1;
        let mut events = Vec::with_capacity(3);
        if dx.abs() > SWIPE_THRESHOLD {
            let kind = if dx < 0 {
                GestureKind::SwipeLeft
            } else {
                GestureKind::SwipeRight
            };
            events.push(GestureEvent::at(kind, end));
        }
        if dy.abs() > SWIPE_THRESHOLD {
            let kind = if dy < 0 {
                GestureKind::SwipeUp
            } else {
                GestureKind::SwipeDown
            };
            events.push(GestureEvent::at(kind, end));
        }
        events.push(GestureEvent::at(GestureKind::DragEnd, end));
        tracing::trace!(dx, dy, "drag end");
        Command::batch(events.into_iter().map(emit))
    }
}

fn emit(event: GestureEvent) -> Command<Message> {
    Command::message(Message::Emitted(event))
}

impl Component for GestureSource {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Input(input) => {
                let Some(point) = input.point() else {
                    return Command::none();
                };
                match (input.phase, self.state) {
                    (Phase::Down, _) => self.press(point, input.target),
                    (Phase::Move, State::Dragging { .. }) => self.track(point),
                    (Phase::Up | Phase::Leave, State::Dragging { origin }) => {
                        self.release(origin, point)
                    }
                    (_, State::Idle) => Command::none(),
                }
            }
            Message::Frame(token) => {
                if self.pending_frame != Some(token) || !self.is_dragging() {
                    return Command::none();
                }
                self.pending_frame = None;
                emit(GestureEvent::at(GestureKind::Dragging, self.latest))
            }
            Message::Emitted(_) => Command::none(),
        }
    }

    /// Gestures have no visual of their own.
    fn view(&self, _frame: &mut Frame, _area: Rect) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use reel_core::testing::TestComponent;

    fn emitted(harness: &TestComponent<GestureSource>) -> Vec<GestureEvent> {
        harness
            .history()
            .iter()
            .filter_map(|msg| match msg {
                Message::Emitted(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    fn kinds(harness: &TestComponent<GestureSource>) -> Vec<GestureKind> {
        emitted(harness).into_iter().map(|e| e.kind).collect()
    }

    fn mouse(phase: Phase, x: f32, y: f32) -> Message {
        Message::Input(PointerInput::mouse(phase, x, y))
    }

    #[test]
    fn drag_start_carries_origin_and_target() {
        let mut doc = reel_core::dom::Document::new(100.0);
        let node = doc.create_element("button");
        let mut harness = TestComponent::new(GestureSource::new(&Platform::immediate()));

        harness.send(Message::Input(
            PointerInput::mouse(Phase::Down, 10.7, 20.2).with_target(node),
        ));

        assert_eq!(
            emitted(&harness),
            vec![GestureEvent {
                kind: GestureKind::DragStart,
                x: 10,
                y: 20,
                origin: Some(node),
            }]
        );
        assert!(harness.component().is_dragging());
    }

    #[test]
    fn swipe_left_then_drag_end() {
        let mut harness = TestComponent::new(GestureSource::new(&Platform::immediate()));
        harness.send(mouse(Phase::Down, 100.0, 50.0));
        harness.send(mouse(Phase::Up, 60.0, 55.0));

        assert_eq!(
            kinds(&harness),
            vec![GestureKind::DragStart, GestureKind::SwipeLeft, GestureKind::DragEnd]
        );
        let end = emitted(&harness)[2];
        assert_eq!((end.x, end.y, end.origin), (60, 55, None));
        assert!(!harness.component().is_dragging());
    }

    #[test]
    fn both_axes_can_swipe_at_once() {
        let mut harness = TestComponent::new(GestureSource::new(&Platform::immediate()));
        harness.send(mouse(Phase::Down, 0.0, 100.0));
        harness.send(mouse(Phase::Leave, 31.0, 60.0));

        assert_eq!(
            kinds(&harness),
            vec![
                GestureKind::DragStart,
                GestureKind::SwipeRight,
                GestureKind::SwipeUp,
                GestureKind::DragEnd,
            ]
        );
    }

    #[test]
    fn exactly_threshold_is_not_a_swipe() {
        let mut harness = TestComponent::new(GestureSource::new(&Platform::immediate()));
        harness.send(mouse(Phase::Down, 0.0, 0.0));
        harness.send(mouse(Phase::Up, -30.0, 30.0));
        assert_eq!(kinds(&harness), vec![GestureKind::DragStart, GestureKind::DragEnd]);
    }

    #[test]
    fn idle_moves_and_releases_are_ignored() {
        let mut harness = TestComponent::new(GestureSource::new(&Platform::immediate()));
        harness.send(mouse(Phase::Move, 5.0, 5.0));
        harness.send(mouse(Phase::Up, 90.0, 5.0));
        harness.send(mouse(Phase::Leave, 90.0, 5.0));
        assert!(kinds(&harness).is_empty());
    }

    #[test]
    fn touch_uses_first_changed_point() {
        let mut harness = TestComponent::new(GestureSource::new(&Platform::immediate()));
        harness.send(Message::Input(PointerInput::touch(
            Phase::Down,
            vec![(200.0, 10.0), (5.0, 5.0)],
        )));
        harness.send(Message::Input(PointerInput::touch(Phase::Up, vec![])));
        harness.send(Message::Input(PointerInput::touch(Phase::Up, vec![(150.0, 12.0)])));

        assert_eq!(
            kinds(&harness),
            vec![GestureKind::DragStart, GestureKind::SwipeLeft, GestureKind::DragEnd]
        );
        assert_eq!(emitted(&harness)[0].x, 200);
    }

    #[test]
    fn moves_emit_immediately_without_frames() {
        let mut harness = TestComponent::new(GestureSource::new(&Platform::immediate()));
        harness.send(mouse(Phase::Down, 0.0, 0.0));
        harness.send(mouse(Phase::Move, 4.0, 0.0));
        harness.send(mouse(Phase::Move, 9.0, 0.0));

        let drags: Vec<_> = emitted(&harness)
            .into_iter()
            .filter(|e| e.kind == GestureKind::Dragging)
            .map(|e| e.x)
            .collect();
        assert_eq!(drags, vec![4, 9]);
        assert_eq!(harness.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn moves_coalesce_into_one_frame() {
        let mut harness = TestComponent::new(GestureSource::new(&Platform::default()));
        harness.send(mouse(Phase::Down, 0.0, 0.0));
        harness.send(mouse(Phase::Move, 3.0, 1.0));
        harness.send(mouse(Phase::Move, 7.0, 2.0));
        harness.send(mouse(Phase::Move, 12.0, 3.0));
        assert_eq!(harness.pending(), 1);

        harness.settle().await;
        let drags: Vec<_> = emitted(&harness)
            .into_iter()
            .filter(|e| e.kind == GestureKind::Dragging)
            .collect();
        assert_eq!(drags.len(), 1);
        assert_eq!((drags[0].x, drags[0].y), (12, 3));
    }

    #[tokio::test(start_paused = true)]
    async fn release_cancels_pending_frame() {
        let mut harness = TestComponent::new(GestureSource::new(&Platform::default()));
        harness.send(mouse(Phase::Down, 0.0, 0.0));
        harness.send(mouse(Phase::Move, 50.0, 0.0));
        harness.send(mouse(Phase::Up, 50.0, 0.0));
        harness.settle().await;

        assert_eq!(
            kinds(&harness),
            vec![GestureKind::DragStart, GestureKind::SwipeRight, GestureKind::DragEnd]
        );
    }

    #[test]
    fn terminal_mouse_maps_to_pixels() {
        let press = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        let input = PointerInput::from_mouse(&press, (8.0, 16.0), None).expect("left press");
        assert_eq!(input.phase, Phase::Down);
        assert_eq!(input.point(), Some((80, 32)));

        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            ..press
        };
        assert!(PointerInput::from_mouse(&scroll, (8.0, 16.0), None).is_none());
    }
}
