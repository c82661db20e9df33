use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Marker type identifying the terminal event subscription.
pub struct TerminalEvents;

/// Subscribe to terminal input, mapping each event to an optional message.
///
/// ```rust,ignore
/// terminal_events(|event| match event {
///     TerminalEvent::Resize(columns, _) => Some(Msg::Resize(columns)),
///     TerminalEvent::Mouse(mouse) => Some(Msg::Mouse(mouse)),
///     _ => None,
/// })
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);
    Subscription {
        id: SubscriptionId::of::<TerminalEvents>(),
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            // The crossterm reader is created inside the task: building one on
            // every `subscriptions()` call would fight the live stream for input.
            tokio::spawn(async move {
                let mut events = EventStream::new();
                while let Some(event) = events.next().await {
                    let Ok(event) = event else { continue };
                    let Some(msg) = map(TerminalEvent::from(event)) else {
                        continue;
                    };
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            })
            .abort_handle()
        }),
    }
}
