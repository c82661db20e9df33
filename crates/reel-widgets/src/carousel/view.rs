//! Terminal rendering and hit testing.
//!
//! The track fills every row of the area but the last; the last row holds
//! the controls, the dots and the counter:
//!
//! ```text
//! ┌────────┐ ┌────────┐ ┌────────┐
//! │Item 1  │ │Item 2  │ │Item 3  │
//! └────────┘ └────────┘ └────────┘
//! ‹ ● ○ ○ ○                   3/10›
//! ```

use super::{Carousel, Phase};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use reel_core::dom::NodeId;
use unicode_width::UnicodeWidthChar;

/// Pixels per terminal column. Hosts convert between the two with this.
pub const CELL_WIDTH: f32 = 8.0;

/// First column of the dots on the control row.
const DOTS_COLUMN: u16 = 2;

struct Slot {
    node: NodeId,
    area: Rect,
    borders: Borders,
}

impl Carousel {
    /// Offset to draw at: the target offset, or an eased point between the
    /// start and the target while a transition runs.
    fn displayed_translate(&self) -> f32 {
        match (self.phase, self.platform.transition) {
            (Phase::Animating { from, started, .. }, Some(duration)) if !duration.is_zero() => {
                let t = (started.elapsed().as_secs_f32() / duration.as_secs_f32()).min(1.0);
                let eased = 1.0 - (1.0 - t).powi(3);
                from + (self.translate - from) * eased
            }
            _ => self.translate,
        }
    }

    /// Where each track node lands in `track`, clipped to it.
    fn slots(&self, track: Rect) -> Vec<Slot> {
        if track.width == 0 || track.height == 0 {
            return Vec::new();
        }
        let translate = self.displayed_translate();
        let step = self.layout.step();
        let width = (self.layout.item_width / CELL_WIDTH).round().max(1.0) as i32;
        let right_edge = i32::from(track.width);

        self.track()
            .into_iter()
            .enumerate()
            .filter_map(|(slot, node)| {
                let left = ((translate + slot as f32 * step) / CELL_WIDTH).round() as i32;
                let right = left + width;
                if right <= 0 || left >= right_edge {
                    return None;
                }
                let mut borders = Borders::TOP | Borders::BOTTOM;
                if left >= 0 {
                    borders |= Borders::LEFT;
                }
                if right <= right_edge {
                    borders |= Borders::RIGHT;
                }
                let start = left.max(0);
                let end = right.min(right_edge);
                Some(Slot {
                    node,
                    area: Rect {
                        x: track.x + start as u16,
                        y: track.y,
                        width: (end - start) as u16,
                        height: track.height,
                    },
                    borders,
                })
            })
            .collect()
    }

    fn split(area: Rect) -> (Rect, Rect) {
        let track_height = area.height.saturating_sub(1);
        let track = Rect {
            height: track_height,
            ..area
        };
        let controls = Rect {
            y: area.y + track_height,
            height: area.height.min(1),
            ..area
        };
        (track, controls)
    }

    pub(super) fn render(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (track, controls) = Self::split(area);

        for slot in self.slots(track) {
            let block = Block::default().borders(slot.borders);
            let inner = block.inner(slot.area);
            let label = truncate(&self.doc.text_content(slot.node), inner.width);
            frame.render_widget(Paragraph::new(label).block(block), slot.area);
        }

        self.render_controls(frame, controls);
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect) {
        let muted = Style::default().fg(Color::DarkGray);
        let active = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let disabled = |node: NodeId| self.doc.attribute(node, "disabled").is_some();

        if let Some((prev, next)) = self.controls {
            let style = |node| if disabled(node) { muted } else { Style::default() };
            frame.render_widget(
                Paragraph::new(Span::styled("‹", style(prev))),
                Rect { width: 1, ..area },
            );
            if area.width > 1 {
                frame.render_widget(
                    Paragraph::new(Span::styled("›", style(next))),
                    Rect {
                        x: area.x + area.width - 1,
                        width: 1,
                        ..area
                    },
                );
            }
        }

        let selected_class = format!("{}--selected", self.config.navigation_item_class);
        let mut spans = Vec::with_capacity(self.dots().len() * 2);
        for (index, dot) in self.dots().iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
            }
            if self.doc.has_class(*dot, &selected_class) {
                spans.push(Span::styled("●", active));
            } else {
                spans.push(Span::styled("○", muted));
            }
        }
        if !spans.is_empty() && area.width > DOTS_COLUMN {
            frame.render_widget(
                Paragraph::new(Line::from(spans)),
                Rect {
                    x: area.x + DOTS_COLUMN,
                    width: area.width - DOTS_COLUMN,
                    ..area
                },
            );
        }

        if let Some(counter) = self.counter {
            let text = format!(
                "{}/{}",
                self.doc.text_content(counter),
                self.item_count()
            );
            let width = text.chars().count() as u16;
            if area.width > width + 1 {
                frame.render_widget(
                    Paragraph::new(Span::styled(text, muted)),
                    Rect {
                        x: area.x + area.width - 1 - width,
                        width,
                        ..area
                    },
                );
            }
        }
    }

    /// The node under cell (`column`, `row`) when the carousel is drawn in
    /// `area`: a control, a dot, a track item, or the wrapper.
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<NodeId> {
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return None;
        }
        let (track, controls) = Self::split(area);

        if row == controls.y {
            let offset = column - controls.x;
            if let Some((prev, next)) = self.controls {
                if offset == 0 {
                    return Some(prev);
                }
                if offset == controls.width - 1 {
                    return Some(next);
                }
            }
            if offset >= DOTS_COLUMN && (offset - DOTS_COLUMN) % 2 == 0 {
                let index = usize::from((offset - DOTS_COLUMN) / 2);
                if let Some(dot) = self.dots().get(index) {
                    return Some(*dot);
                }
            }
            return Some(self.element);
        }

        let hit = self.slots(track).into_iter().find(|slot| {
            column >= slot.area.x && column < slot.area.x + slot.area.width
        });
        Some(hit.map_or(self.wrapper, |slot| slot.node))
    }
}

/// Cut `text` to at most `width` columns.
fn truncate(text: &str, width: u16) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= usize::from(width)
        })
        .collect()
}
