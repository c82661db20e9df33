//! Finding carousels in a document and reading their data attributes.

use super::{CarouselConfig, DEFAULT_AUTOPLAY_INTERVAL};
use reel_core::dom::{Document, NodeId};
use std::time::Duration;

/// Class marking an element to be built as a carousel.
pub const CAROUSEL_CLASS: &str = "js-carousel";

/// Every `.js-carousel` element in document order, with the configuration
/// its data attributes describe. Discovered carousels always announce page
/// changes.
pub fn discover(doc: &Document) -> Vec<(NodeId, CarouselConfig)> {
    doc.elements_by_class(doc.root(), CAROUSEL_CLASS)
        .into_iter()
        .map(|element| (element, read_config(doc, element)))
        .collect()
}

fn read_config(doc: &Document, element: NodeId) -> CarouselConfig {
    let flag = |name: &str, on: &str| doc.attribute(element, name) == Some(on);
    let text = |name: &str| doc.attribute(element, name).map(str::to_string);

    let mut config = CarouselConfig::default()
        .with_drag(flag("data-drag", "on"))
        .with_looping(!flag("data-loop", "off"))
        .with_navigation(flag("data-navigation", "on"))
        .with_navigation_pagination(flag("data-navigation-pagination", "on"))
        .with_overflow_items(flag("data-overflow-items", "on"))
        .with_justify_content(flag("data-justify-content", "on"))
        .with_aria_live(true);

    if flag("data-autoplay", "on") {
        let interval = autoplay_interval(doc.attribute(element, "data-autoplay-interval"));
        config = config.with_autoplay(interval);
    }
    if let Some(class) = text("data-navigation-class") {
        config.navigation_class = class;
    }
    if let Some(class) = text("data-navigation-item-class") {
        config.navigation_item_class = class;
    }
    if let Some(class) = text("data-align-controls") {
        config = config.with_align_controls(class);
    }
    config
}

fn autoplay_interval(raw: Option<&str>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_AUTOPLAY_INTERVAL;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => {
            tracing::warn!(value = raw, "invalid data-autoplay-interval, using default");
            DEFAULT_AUTOPLAY_INTERVAL
        }
    }
}
