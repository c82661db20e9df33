//! Core runtime and platform layer for **reel** widgets.
//!
//! Widgets are written in the Elm style: state is folded by `update`, side
//! effects are returned as [`Command`]s, long-lived sources are declared as
//! [`Subscription`]s, and drawing happens in `view`. Widgets never touch a
//! clock or a thread directly, which keeps them deterministic under test.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application (init / update / view) |
//! | [`Component`] | Embeddable widget that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Deferred or immediate side effect |
//! | [`Subscription`] | Long-lived event source ([`Every`], [`After`], [`terminal_events`]) |
//! | [`Program`] | Runs a [`Model`] in a real terminal |
//! | [`dom::Document`] | Retained element tree widgets mutate and measure |
//! | [`Platform`] | What the host can do (transitions, frames, layout features) |
//! | [`testing::TestProgram`] / [`testing::TestComponent`] | Headless drivers for tests |
//!
//! # Example
//!
//! ```ignore
//! use reel_core::{Command, Model};
//! use ratatui::{widgets::Paragraph, Frame};
//!
//! struct Slides { index: usize }
//! enum Msg { Next }
//!
//! impl Model for Slides {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         (Slides { index: 0 }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Next => self.index += 1,
//!         }
//!         Command::none()
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.render_widget(Paragraph::new(format!("slide {}", self.index)), frame.area());
//!     }
//! }
//! ```

pub mod command;
pub mod component;
pub mod dom;
pub mod event;
pub mod model;
pub mod platform;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use platform::Platform;
pub use runtime::{Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{terminal_events, After, Every};

/// Run a model with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run a model with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
