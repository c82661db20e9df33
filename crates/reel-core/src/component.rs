use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A self-contained widget that a parent embeds and routes messages to.
///
/// A component owns its state, reacts to its own `Message` type in
/// [`update`](Component::update), and paints itself into whatever `Rect` the
/// parent hands to [`view`](Component::view). Parents wrap the child's
/// messages in one of their own variants and lift returned commands with
/// [`Command::map`]:
///
/// ```rust,ignore
/// enum AppMsg { Carousel(carousel::Message) }
///
/// fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///     match msg {
///         AppMsg::Carousel(m) => self.carousel.update(m).map(AppMsg::Carousel),
///     }
/// }
/// ```
///
/// Messages a component emits for the outside world (a widget finished a
/// transition, a gesture was recognised) travel the same way: the component
/// returns them as [`Command::message`], the parent sees them pass through on
/// their way back in.
pub trait Component: Send + 'static {
    /// The component's message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return follow-up work.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations must stay inside the rectangle.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Long-lived event sources this component currently needs.
    ///
    /// The parent collects these into its own subscription list. The runtime
    /// diffs the list after every update, so returning a subscription with a
    /// new id restarts it and omitting it cancels it.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
