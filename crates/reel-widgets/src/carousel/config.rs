use crate::key::{Binding, KeyCombination};
use crossterm::event::KeyCode;
use std::time::Duration;

pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_NAVIGATION_CLASS: &str = "carousel__navigation";
pub const DEFAULT_NAVIGATION_ITEM_CLASS: &str = "carousel__nav-item";

/// Per-instance carousel options. Fixed once the carousel is built.
///
/// ```rust,ignore
/// let config = CarouselConfig::default()
///     .with_autoplay(Duration::from_secs(3))
///     .with_drag(true)
///     .with_aria_live(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub autoplay: bool,
    pub autoplay_interval: Duration,
    /// Wrap around using clones. Ignored when `navigation` is on.
    pub looping: bool,
    pub drag: bool,
    /// Render navigation dots.
    pub navigation: bool,
    pub navigation_class: String,
    pub navigation_item_class: String,
    /// Show page numbers in the dots instead of keeping them screen-reader only.
    pub navigation_pagination: bool,
    /// Center the track when there are fewer items than fit.
    pub justify_content: bool,
    /// Class of the element the controls are aligned to.
    pub align_controls: Option<String>,
    /// Keep the partially visible items on either side reachable.
    pub overflow_items: bool,
    /// Announce page changes in a polite live region.
    pub aria_live: bool,
    pub keys: CarouselKeys,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            autoplay_interval: DEFAULT_AUTOPLAY_INTERVAL,
            looping: true,
            drag: false,
            navigation: false,
            navigation_class: DEFAULT_NAVIGATION_CLASS.to_string(),
            navigation_item_class: DEFAULT_NAVIGATION_ITEM_CLASS.to_string(),
            navigation_pagination: false,
            justify_content: false,
            align_controls: None,
            overflow_items: false,
            aria_live: false,
            keys: CarouselKeys::default(),
        }
    }
}

impl CarouselConfig {
    /// Whether looping is actually in effect.
    pub fn loops(&self) -> bool {
        self.looping && !self.navigation
    }

    pub fn with_autoplay(mut self, interval: Duration) -> Self {
        self.autoplay = true;
        self.autoplay_interval = interval;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_drag(mut self, drag: bool) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_navigation(mut self, navigation: bool) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn with_navigation_classes(
        mut self,
        navigation_class: impl Into<String>,
        navigation_item_class: impl Into<String>,
    ) -> Self {
        self.navigation_class = navigation_class.into();
        self.navigation_item_class = navigation_item_class.into();
        self
    }

    pub fn with_navigation_pagination(mut self, pagination: bool) -> Self {
        self.navigation_pagination = pagination;
        self
    }

    pub fn with_justify_content(mut self, justify: bool) -> Self {
        self.justify_content = justify;
        self
    }

    pub fn with_align_controls(mut self, class: impl Into<String>) -> Self {
        self.align_controls = Some(class.into());
        self
    }

    pub fn with_overflow_items(mut self, overflow: bool) -> Self {
        self.overflow_items = overflow;
        self
    }

    pub fn with_aria_live(mut self, aria_live: bool) -> Self {
        self.aria_live = aria_live;
        self
    }

    pub fn with_keys(mut self, keys: CarouselKeys) -> Self {
        self.keys = keys;
        self
    }
}

/// Keyboard shortcuts for paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselKeys {
    pub prev: Binding,
    pub next: Binding,
}

impl Default for CarouselKeys {
    fn default() -> Self {
        Self {
            prev: Binding::new(
                vec![KeyCombination::new(KeyCode::Left), KeyCombination::new(KeyCode::Char('h'))],
                "previous page",
            ),
            next: Binding::new(
                vec![KeyCombination::new(KeyCode::Right), KeyCombination::new(KeyCode::Char('l'))],
                "next page",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CarouselConfig::default();
        assert!(config.loops());
        assert!(!config.autoplay);
        assert_eq!(config.autoplay_interval, Duration::from_secs(5));
        assert_eq!(config.navigation_item_class, "carousel__nav-item");
        assert_eq!(config.align_controls, None);
    }

    #[test]
    fn navigation_turns_looping_off() {
        let config = CarouselConfig::default().with_navigation(true);
        assert!(config.looping);
        assert!(!config.loops());
    }
}
