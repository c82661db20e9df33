//! **reel** -- a carousel engine for [`ratatui`] applications.
//!
//! This is the umbrella crate:
//!
//! * Everything from [`reel_core`] is available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Subscription`], [`Program`],
//!   [`run`], [`run_with`], the [`dom`] element tree, etc.).
//! * The [`widgets`] module re-exports [`reel_widgets`] (the carousel and the
//!   gesture source).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use reel::dom::Document;
//! use reel::widgets::carousel::{markup::CarouselMarkup, Carousel, CarouselConfig};
//! use reel::Platform;
//!
//! let mut doc = Document::new(920.0);
//! let nodes = CarouselMarkup::new(10).build(&mut doc);
//! let mut carousel = Carousel::new(doc, nodes.element, CarouselConfig::default(), Platform::default())?;
//! let cmd = carousel.show_next();
//! ```

pub use reel_core::*;
pub mod widgets {
    pub use reel_widgets::*;
}

pub use crossterm;
pub use ratatui;
pub use tokio;
