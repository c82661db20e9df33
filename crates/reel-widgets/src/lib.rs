//! Widgets for the **reel** framework.
//!
//! Every widget implements [`reel_core::Component`], so it can be embedded in
//! any [`reel_core::Model`] and drawn inside a [`ratatui`] layout.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`carousel`] | Loopable, draggable carousel over a [`reel_core::dom::Document`] |
//! | [`gesture`] | Drag and swipe recognition from mouse or touch input |
//! | [`key`] | Key-binding helpers |

pub mod carousel;
pub mod gesture;
pub mod key;
