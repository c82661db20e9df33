//! # Carousel Demo
//!
//! A full-width carousel driven by the keyboard and the mouse:
//! - `←`/`h` and `→`/`l` page, clicks on `‹`/`›` and the dots work too
//! - drag the track with the left mouse button to page or snap back
//! - autoplay pauses while the pointer is over the carousel
//! - resizing the terminal re-fits the items after a short debounce
//!
//! Configuration is read from data attributes on the markup, the same way a
//! page would declare it.
//!
//! Run with: `cargo run --example carousel`
//! Trace output: `REEL_LOG=reel.log RUST_LOG=reel_widgets=trace cargo run --example carousel`

use reel::crossterm::event::{KeyCode, MouseEvent, MouseEventKind};
use reel::dom::Document;
use reel::ratatui::layout::{Alignment, Constraint, Layout, Rect};
use reel::ratatui::style::{Color, Modifier, Style};
use reel::ratatui::text::{Line, Span};
use reel::ratatui::widgets::Paragraph;
use reel::ratatui::Frame;
use reel::widgets::carousel::markup::CarouselMarkup;
use reel::widgets::carousel::{self, discover, Carousel, CELL_WIDTH};
use reel::widgets::gesture::PointerInput;
use reel::{
    run_with, terminal_events, Command, Component, Model, Platform, ProgramOptions,
    Subscription, TerminalEvent,
};
use std::path::PathBuf;

/// Cell height in px, for turning mouse rows into pointer coordinates.
const CELL_HEIGHT: f32 = 16.0;

const FLAVOURS: [&str; 12] = [
    "Taro", "Matcha", "Brown sugar", "Mango", "Lychee", "Jasmine", "Oolong", "Coconut",
    "Strawberry", "Honeydew", "Passion fruit", "Thai tea",
];

struct Demo {
    carousel: Carousel,
    size: (u16, u16),
    hovering: bool,
}

#[derive(Debug)]
enum Msg {
    Carousel(carousel::Message),
    Resized(u16, u16),
    Mouse(MouseEvent),
    Quit,
}

/// Title, carousel, help line.
fn regions(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(area)
}

impl Demo {
    fn carousel_area(&self) -> Rect {
        let [_, carousel, _] = regions(Rect::new(0, 0, self.size.0, self.size.1));
        carousel
    }

    fn send(&mut self, msg: carousel::Message) -> Command<Msg> {
        self.carousel.update(msg).map(Msg::Carousel)
    }

    fn mouse(&mut self, event: MouseEvent) -> Command<Msg> {
        let area = self.carousel_area();
        let target = self.carousel.hit_test(area, event.column, event.row);

        let mut cmds = Vec::new();
        let over = target.is_some();
        if over != self.hovering {
            self.hovering = over;
            let hover = if over {
                carousel::Message::PointerEnter
            } else {
                carousel::Message::PointerLeave
            };
            cmds.push(self.send(hover));
        }
        if let (MouseEventKind::Down(_), Some(node)) = (event.kind, target) {
            cmds.push(self.send(carousel::Message::Click(node)));
        }
        if let Some(input) = PointerInput::from_mouse(&event, (CELL_WIDTH, CELL_HEIGHT), target) {
            cmds.push(self.send(carousel::Message::Pointer(input)));
        }
        Command::batch(cmds)
    }
}

impl Model for Demo {
    type Message = Msg;
    type Flags = Carousel;

    fn init(mut carousel: Carousel) -> (Self, Command<Msg>) {
        let updates = carousel.take_updates().map(Msg::Carousel);
        let demo = Demo {
            carousel,
            size: (0, 0),
            hovering: false,
        };
        (
            demo,
            Command::batch([updates, Command::window_size(Msg::Resized)]),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Carousel(carousel::Message::Updated(clones)) => {
                tracing::trace!(count = clones.len(), "clones inserted");
                Command::none()
            }
            Msg::Carousel(msg) => self.send(msg),
            Msg::Resized(columns, rows) => {
                self.size = (columns, rows);
                let viewport_width = f32::from(columns) * CELL_WIDTH;
                self.send(carousel::Message::Resize { viewport_width })
            }
            Msg::Mouse(event) => self.mouse(event),
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [title, body, help] = regions(frame.area());

        let heading = Line::from(vec![
            Span::styled(
                " Bubble tea flavours ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "{} of {} visible",
                    self.carousel.visible_count(),
                    self.carousel.item_count()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(heading), title);

        self.carousel.view(frame, body);

        let hint = Paragraph::new("←/h prev  →/l next  drag to swipe  q quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(hint, help);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs: Vec<_> = self
            .carousel
            .subscriptions()
            .into_iter()
            .map(|sub| sub.map(Msg::Carousel))
            .collect();
        subs.push(terminal_events(|event| match event {
            TerminalEvent::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
                _ => Some(Msg::Carousel(carousel::Message::Key(key))),
            },
            TerminalEvent::Mouse(mouse) => Some(Msg::Mouse(mouse)),
            TerminalEvent::Resize(columns, rows) => Some(Msg::Resized(columns, rows)),
            TerminalEvent::FocusGained => Some(Msg::Carousel(carousel::Message::FocusIn)),
            TerminalEvent::FocusLost => Some(Msg::Carousel(carousel::Message::FocusOut)),
            TerminalEvent::Paste(_) => None,
        }));
        subs
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::new(80.0 * CELL_WIDTH);
    CarouselMarkup::with_labels(FLAVOURS)
        .item_width(180.0)
        .margin(16.0)
        .attribute("data-autoplay", "on")
        .attribute("data-autoplay-interval", "4000")
        .attribute("data-drag", "on")
        .build(&mut doc);

    let (element, config) = discover(&doc)
        .into_iter()
        .next()
        .ok_or("no carousel in the document")?;
    let carousel = Carousel::new(doc, element, config, Platform::default())?;

    let options = ProgramOptions {
        mouse_capture: true,
        focus_reporting: true,
        title: Some("reel carousel".to_string()),
        log_file: std::env::var_os("REEL_LOG").map(PathBuf::from),
        ..ProgramOptions::default()
    };
    run_with::<Demo>(carousel, options).await?;
    Ok(())
}
