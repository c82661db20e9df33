//! A loopable, draggable carousel over a [`Document`] subtree.
//!
//! The carousel owns the document it was built on and drives the markup the
//! way a script would: it sizes items, keeps a buffer of clones around the
//! visible window so paging can wrap forever, translates the track, and keeps
//! controls, dots, the counter, the live region and tab order in sync.
//!
//! Required markup inside the carousel element:
//!
//! ```text
//! .carousel__wrapper
//!   .carousel__list
//!     .carousel__item  (one or more)
//! .js-carousel__control  x2      (optional: previous, next)
//! .js-carousel__counter          (optional)
//! .js-carousel__counter-tot      (optional)
//! ```
//!
//! [`markup::CarouselMarkup`] builds this structure. Timers are expressed as
//! commands and subscriptions, so a host runs the carousel like any other
//! [`Component`].

mod clones;
mod config;
mod controls;
pub mod discovery;
mod error;
mod layout;
pub mod markup;
mod navigation;
mod view;

pub use config::{
    CarouselConfig, CarouselKeys, DEFAULT_AUTOPLAY_INTERVAL, DEFAULT_NAVIGATION_CLASS,
    DEFAULT_NAVIGATION_ITEM_CLASS,
};
pub use discovery::discover;
pub use error::CarouselError;
pub use layout::{fit, Layout};
pub use view::CELL_WIDTH;

use crate::gesture::{self, GestureSource, PointerInput};
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;
use reel_core::dom::{Document, NodeId};
use reel_core::{subscribe, Command, Component, Every, Platform, Subscription};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub const WRAPPER_CLASS: &str = "carousel__wrapper";
pub const LIST_CLASS: &str = "carousel__list";
pub const ITEM_CLASS: &str = "carousel__item";
pub const CONTROL_CLASS: &str = "js-carousel__control";
pub const COUNTER_CLASS: &str = "js-carousel__counter";
pub const COUNTER_TOTAL_CLASS: &str = "js-carousel__counter-tot";
pub const NAVIGATION_CLASS: &str = "js-carousel__navigation";
pub const NAV_ITEM_CLASS: &str = "js-carousel__nav-item";
pub const LIVE_REGION_CLASS: &str = "js-carousel__aria-live";
pub const LOADED_CLASS: &str = "carousel--loaded";
pub const DRAGGING_CLASS: &str = "carousel--is-dragging";
pub const ANIMATING_CLASS: &str = "carousel__list--animating";
pub const JUSTIFY_CLASS: &str = "justify-center";

/// Quiet period before a burst of resize events is handled.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Page forward.
    Next,
    /// Page back.
    Prev,
    /// Jump to a zero-based page.
    JumpToPage(usize),
    /// A click landed on `target`. Controls and dots are recognised by
    /// walking up from the target.
    Click(NodeId),
    Key(KeyEvent),
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    /// Raw pointer input for the drag detector. Ignored unless drag is on.
    Pointer(PointerInput),
    Gesture(gesture::Message),
    Resize {
        viewport_width: f32,
    },
    ResizeSettled(u64),
    TransitionEnd(u64),
    AutoplayTick,
    /// Redraw tick while a transition is in flight.
    AnimationFrame,
    /// Outward notification: these clones were just inserted into the track.
    Updated(Vec<NodeId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Next,
    Prev,
    Jump(usize),
    /// Return to the resting offset after an inconclusive drag.
    Settle,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Animating {
        token: u64,
        motion: Motion,
        from: f32,
        started: Instant,
    },
}

#[derive(Debug, Default)]
struct Autoplay {
    armed: bool,
    /// Held by hover or focus.
    paused: bool,
    generation: u64,
}

#[derive(Debug)]
struct Navigation {
    list: NodeId,
    dots: Vec<NodeId>,
}

pub struct Carousel {
    doc: Document,
    platform: Platform,
    config: CarouselConfig,
    instance: u64,

    element: NodeId,
    wrapper: NodeId,
    list: NodeId,
    originals: Vec<NodeId>,
    clone_origin: HashMap<NodeId, usize>,
    controls: Option<(NodeId, NodeId)>,
    counter: Option<NodeId>,
    counter_total: Option<NodeId>,
    live_region: Option<NodeId>,
    navigation: Option<Navigation>,
    align_target: Option<NodeId>,

    layout: Layout,
    natural_width: Option<f32>,
    selected: usize,
    translate: f32,
    phase: Phase,
    autoplay: Autoplay,
    drag_origin: Option<i32>,
    gesture: Option<GestureSource>,
    resize_generation: u64,
    next_token: u64,
    /// Clone batches inserted since the last command went out.
    outbox: Vec<Vec<NodeId>>,
}

impl Carousel {
    /// Build a carousel on `element`, which must live in `doc`.
    ///
    /// Clones inserted while building are reported by
    /// [`Carousel::take_updates`].
    pub fn new(
        doc: Document,
        element: NodeId,
        config: CarouselConfig,
        platform: Platform,
    ) -> Result<Self, CarouselError> {
        if doc.element(element).is_none() {
            return Err(CarouselError::UnknownElement);
        }
        let wrapper = doc
            .first_by_class(element, WRAPPER_CLASS)
            .ok_or(CarouselError::MissingWrapper)?;
        let list = doc
            .first_by_class(element, LIST_CLASS)
            .ok_or(CarouselError::MissingList)?;
        let originals: Vec<_> = doc
            .element_children(list)
            .into_iter()
            .filter(|node| doc.has_class(*node, ITEM_CLASS))
            .collect();
        if originals.is_empty() {
            return Err(CarouselError::NoItems);
        }
        let controls = match doc.elements_by_class(element, CONTROL_CLASS).as_slice() {
            [prev, next, ..] => Some((*prev, *next)),
            _ => None,
        };
        let counter = doc.first_by_class(element, COUNTER_CLASS);
        let counter_total = doc.first_by_class(element, COUNTER_TOTAL_CLASS);
        let gesture = config.drag.then(|| GestureSource::new(&platform));

        let mut carousel = Self {
            doc,
            platform,
            config,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            element,
            wrapper,
            list,
            originals,
            clone_origin: HashMap::new(),
            controls,
            counter,
            counter_total,
            live_region: None,
            navigation: None,
            align_target: None,
            layout: Layout::default(),
            natural_width: None,
            selected: 0,
            translate: 0.0,
            phase: Phase::Idle,
            autoplay: Autoplay::default(),
            drag_origin: None,
            gesture,
            resize_generation: 0,
            next_token: 0,
            outbox: Vec::new(),
        };
        carousel.layout = carousel.measure();
        carousel.apply_layout();
        if carousel.loops() && carousel.is_active() {
            carousel.fill_buffer();
        }
        let rest = carousel.rest_translate();
        carousel.set_translate(rest);
        carousel.refresh_tab_indices();
        carousel.create_live_region();
        carousel.build_navigation();
        carousel.reset_controls();
        carousel.start_autoplay();
        carousel.init_counter();
        carousel.center_items();
        carousel.align_controls();
        carousel.doc.add_class(element, LOADED_CLASS);

        tracing::debug!(
            items = carousel.item_count(),
            visible = carousel.layout.visible,
            item_width = carousel.layout.item_width,
            looping = carousel.loops(),
            "carousel ready"
        );
        Ok(carousel)
    }

    // --- Public operations ---

    pub fn show_next(&mut self) -> Command<Message> {
        let cmd = self.navigate(Motion::Next);
        self.with_updates(cmd)
    }

    pub fn show_prev(&mut self) -> Command<Message> {
        let cmd = self.navigate(Motion::Prev);
        self.with_updates(cmd)
    }

    /// Show the zero-based `page`, clamped to the last full window.
    pub fn jump_to_page(&mut self, page: usize) -> Command<Message> {
        let cmd = self.navigate(Motion::Jump(page));
        self.with_updates(cmd)
    }

    /// Arm the autoplay timer unless autoplay is off, already armed, or held
    /// by hover/focus.
    pub fn start_autoplay(&mut self) {
        if self.config.autoplay && !self.autoplay.armed && !self.autoplay.paused {
            self.autoplay.armed = true;
            self.autoplay.generation += 1;
        }
    }

    pub fn pause_autoplay(&mut self) {
        if self.config.autoplay {
            self.autoplay.armed = false;
        }
    }

    /// Clone batches inserted outside of `update` (while building), as
    /// [`Message::Updated`] commands.
    pub fn take_updates(&mut self) -> Command<Message> {
        self.with_updates(Command::none())
    }

    // --- Accessors ---

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Index of the first visible original item.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn visible_count(&self) -> usize {
        self.layout.visible
    }

    pub fn item_width(&self) -> f32 {
        self.layout.item_width
    }

    pub fn item_count(&self) -> usize {
        self.originals.len()
    }

    /// Current horizontal offset of the track, in px.
    pub fn translate(&self) -> f32 {
        self.translate
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating { .. })
    }

    /// More items than fit: paging does something.
    pub fn is_active(&self) -> bool {
        self.item_count() > self.layout.visible
    }

    pub fn is_autoplay_armed(&self) -> bool {
        self.autoplay.armed
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Nodes currently in the track, in order.
    pub fn track(&self) -> Vec<NodeId> {
        self.doc
            .element_children(self.list)
            .into_iter()
            .filter(|node| self.doc.has_class(*node, ITEM_CLASS))
            .collect()
    }

    /// Track nodes that are clones.
    pub fn clones(&self) -> Vec<NodeId> {
        self.track()
            .into_iter()
            .filter(|node| self.clone_origin.contains_key(node))
            .collect()
    }

    /// Which original item `node` shows, for originals and clones alike.
    pub fn item_index(&self, node: NodeId) -> Option<usize> {
        self.originals
            .iter()
            .position(|original| *original == node)
            .or_else(|| self.clone_origin.get(&node).copied())
    }

    pub fn dot_count(&self) -> usize {
        self.navigation.as_ref().map_or(0, |nav| nav.dots.len())
    }

    pub fn dots(&self) -> &[NodeId] {
        self.navigation.as_ref().map_or(&[], |nav| nav.dots.as_slice())
    }

    pub fn controls(&self) -> Option<(NodeId, NodeId)> {
        self.controls
    }

    pub fn live_region(&self) -> Option<NodeId> {
        self.live_region
    }

    // --- Internals shared by the submodules ---

    fn loops(&self) -> bool {
        self.config.loops()
    }

    fn wrap(&self, index: isize) -> usize {
        let n = self.item_count() as isize;
        (((index % n) + n) % n) as usize
    }

    /// Offset of the track when nothing is moving.
    fn rest_translate(&self) -> f32 {
        if !self.is_active() {
            0.0
        } else if self.loops() {
            self.layout.window_translate()
        } else {
            -(self.selected as f32) * self.layout.step()
        }
    }

    fn set_translate(&mut self, translate: f32) {
        self.translate = translate;
        self.doc
            .set_inline(self.list, |style| style.translate_x = Some(translate));
    }

    fn token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Fold a local timer generation into one unique to this instance, so two
    /// carousels never share a subscription id.
    fn timer_generation(&self, local: u64) -> u64 {
        (self.instance << 32) | (local & 0xffff_ffff)
    }

    fn with_updates(&mut self, cmd: Command<Message>) -> Command<Message> {
        let updates = std::mem::take(&mut self.outbox)
            .into_iter()
            .map(|clones| Command::message(Message::Updated(clones)));
        Command::batch(std::iter::once(cmd).chain(updates))
    }

    fn resize(&mut self, viewport_width: f32) -> Command<Message> {
        self.doc.set_viewport_width(viewport_width);
        self.pause_autoplay();
        self.resize_generation += 1;
        let generation = self.resize_generation;
        Command::tick(RESIZE_DEBOUNCE, move |_| Message::ResizeSettled(generation))
    }

    fn resize_settled(&mut self, generation: u64) -> Command<Message> {
        if generation != self.resize_generation {
            return Command::none();
        }
        if self.is_animating() {
            tracing::trace!("transition in flight, deferring resize");
            return Command::tick(RESIZE_DEBOUNCE, move |_| Message::ResizeSettled(generation));
        }
        self.relayout();
        self.rebuild_navigation();
        self.reset_controls();
        self.update_counter();
        self.start_autoplay();
        self.center_items();
        self.align_controls();
        Command::none()
    }

    fn forward_to_gesture(&mut self, msg: gesture::Message) -> Command<Message> {
        match &mut self.gesture {
            Some(gesture) => gesture.update(msg).map(Message::Gesture),
            None => Command::none(),
        }
    }
}

impl Component for Carousel {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        let cmd = match msg {
            Message::Next => self.navigate(Motion::Next),
            // A tick can already be queued when the timer is disarmed.
            Message::AutoplayTick if !self.autoplay.armed => Command::none(),
            Message::AutoplayTick => self.navigate(Motion::Next),
            Message::Prev => self.navigate(Motion::Prev),
            Message::JumpToPage(page) => self.navigate(Motion::Jump(page)),
            Message::Click(target) => self.click(target),
            Message::Key(key) => {
                if self.config.keys.prev.matches(&key) {
                    self.navigate(Motion::Prev)
                } else if self.config.keys.next.matches(&key) {
                    self.navigate(Motion::Next)
                } else {
                    Command::none()
                }
            }
            Message::PointerEnter | Message::FocusIn => {
                if self.config.autoplay {
                    self.pause_autoplay();
                    self.autoplay.paused = true;
                }
                Command::none()
            }
            Message::PointerLeave | Message::FocusOut => {
                if self.config.autoplay {
                    self.autoplay.paused = false;
                    self.start_autoplay();
                }
                Command::none()
            }
            Message::Pointer(input) => self.forward_to_gesture(gesture::Message::Input(input)),
            Message::Gesture(gesture::Message::Emitted(event)) => self.on_gesture(event),
            Message::Gesture(inner) => self.forward_to_gesture(inner),
            Message::Resize { viewport_width } => self.resize(viewport_width),
            Message::ResizeSettled(generation) => self.resize_settled(generation),
            Message::TransitionEnd(token) => self.transition_end(token),
            Message::AnimationFrame | Message::Updated(_) => Command::none(),
        };
        self.with_updates(cmd)
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.render(frame, area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        let mut subs = Vec::new();
        if self.autoplay.armed {
            let timer = Every::new(self.config.autoplay_interval, "carousel-autoplay")
                .generation(self.timer_generation(self.autoplay.generation));
            subs.push(subscribe(timer).map(|_| Message::AutoplayTick));
        }
        if let (Phase::Animating { .. }, Some(frame), Some(_)) = (
            self.phase,
            self.platform.animation_frame,
            self.platform.transition,
        ) {
            let timer = Every::new(frame, "carousel-frame").generation(self.timer_generation(0));
            subs.push(subscribe(timer).map(|_| Message::AnimationFrame));
        }
        subs
    }
}
