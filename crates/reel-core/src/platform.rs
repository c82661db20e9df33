//! What the host environment can do.
//!
//! Widgets consult these flags instead of probing at runtime. Every missing
//! capability has a synchronous fallback, so a widget on a bare platform
//! behaves the same, just without animation.

use std::time::Duration;

/// Host capabilities relevant to animated widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Length of a CSS-style transition, or `None` if transitions are not
    /// supported (completion is then immediate).
    pub transition: Option<Duration>,
    /// Animation frame interval, or `None` if frames cannot be scheduled
    /// (frame-bound work then runs immediately).
    pub animation_frame: Option<Duration>,
    /// Whether the layout engine lays out rows on its own. Without it, tracks
    /// get an explicit width.
    pub flexbox: bool,
    /// Whether the natural width of an element can be re-read after inline
    /// overrides are cleared.
    pub custom_properties: bool,
}

impl Platform {
    /// A platform with no transitions and no frame scheduling.
    pub fn immediate() -> Self {
        Self {
            transition: None,
            animation_frame: None,
            ..Self::default()
        }
    }

    /// Override the transition duration.
    pub fn with_transition(mut self, transition: Option<Duration>) -> Self {
        self.transition = transition;
        self
    }

    /// Override the animation frame interval.
    pub fn with_animation_frame(mut self, frame: Option<Duration>) -> Self {
        self.animation_frame = frame;
        self
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            transition: Some(Duration::from_millis(300)),
            animation_frame: Some(Duration::from_millis(16)),
            flexbox: true,
            custom_properties: true,
        }
    }
}
