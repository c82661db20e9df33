use crossterm::event::{KeyEvent, MouseEvent};

/// Terminal input delivered through
/// [`terminal_events`](crate::subscriptions::terminal_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A key press or release.
    Key(KeyEvent),
    /// A mouse button, drag, move or scroll.
    Mouse(MouseEvent),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// The terminal window gained focus.
    FocusGained,
    /// The terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl From<crossterm::event::Event> for TerminalEvent {
    fn from(event: crossterm::event::Event) -> Self {
        use crossterm::event::Event;
        match event {
            Event::Key(key) => TerminalEvent::Key(key),
            Event::Mouse(mouse) => TerminalEvent::Mouse(mouse),
            Event::Resize(columns, rows) => TerminalEvent::Resize(columns, rows),
            Event::FocusGained => TerminalEvent::FocusGained,
            Event::FocusLost => TerminalEvent::FocusLost,
            Event::Paste(text) => TerminalEvent::Paste(text),
        }
    }
}
