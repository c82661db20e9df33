use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application driven by a [`Program`](crate::Program).
///
/// `init` builds the first state, `update` folds messages into it, `view`
/// draws it, and `subscriptions` declares which event sources should be live
/// for the current state. The runtime calls `view` and `subscriptions` after
/// every update.
pub trait Model: Sized + Send + 'static {
    /// The application's message type.
    type Message: Send + 'static;

    /// Startup data handed to [`Model::init`]. Use `()` when none is needed.
    type Flags: Send + 'static;

    /// Create the initial state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Fold one message into the state.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Draw the current state.
    fn view(&self, frame: &mut Frame);

    /// Event sources that should be active for the current state.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
