use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source (a timer, the terminal's event stream, ...).
///
/// Subscriptions are declarative: a model returns the ones it wants from
/// `subscriptions()` and the runtime starts, keeps, or aborts them by
/// comparing [`SubscriptionId`]s with the previous cycle.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>,
}

/// Identity used to diff subscriptions between update cycles.
///
/// Two subscriptions with equal ids are considered the same running source.
/// Changing any part of the id (for instance a generation counter) makes the
/// runtime abort the old source and start a fresh one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// An id made of a type and a numeric discriminant.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// An id for a singleton source of type `T`.
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }

    /// An id made of a type and a name.
    pub fn with_str<T: 'static>(name: &str) -> Self {
        Self::keyed::<T>(name, 0)
    }

    /// An id made of a type, a name and a generation.
    ///
    /// Bumping the generation restarts the source even though the name is
    /// unchanged, which is how a repeating timer gets its phase reset.
    pub fn keyed<T: 'static>(name: &str, generation: u64) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        generation.hash(&mut hasher);
        Self::new::<T>(hasher.finish())
    }
}

/// Something that can be turned into a stream of values.
pub trait SubscriptionSource: Send + 'static {
    /// The type of values this source emits.
    type Output: Send + 'static;

    /// Identity of this source instance.
    fn id(&self) -> SubscriptionId;

    /// Build the stream. Called once, when the subscription starts.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Turn a [`SubscriptionSource`] into a [`Subscription`].
pub fn subscribe<S: SubscriptionSource>(source: S) -> Subscription<S::Output> {
    let id = source.id();
    Subscription {
        id,
        spawn: Box::new(move |tx| forward(source.stream(), tx)),
    }
}

fn forward<Msg: Send + 'static>(
    mut stream: BoxStream<'static, Msg>,
    tx: mpsc::UnboundedSender<Msg>,
) -> AbortHandle {
    tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            if tx.send(msg).is_err() {
                break;
            }
        }
    })
    .abort_handle()
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Wrap an existing stream.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            spawn: Box::new(move |tx| forward(stream, tx)),
        }
    }

    /// The id the runtime diffs on.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Lift the message type, e.g. from a child component into its parent.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let f = Arc::new(f);
        Subscription {
            id: self.id,
            spawn: Box::new(move |outer: mpsc::UnboundedSender<NewMsg>| {
                let (inner, mut inner_rx) = mpsc::unbounded_channel::<Msg>();
                let abort = (self.spawn)(inner);
                // Aborting the source drops `inner`, which ends this relay.
                tokio::spawn(async move {
                    while let Some(msg) = inner_rx.recv().await {
                        if outer.send(f(msg)).is_err() {
                            break;
                        }
                    }
                });
                abort
            }),
        }
    }
}

/// Keeps the running set of subscriptions in sync with what the model asks for.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Abort sources that disappeared, start the new ones, keep the rest.
    pub fn reconcile(&mut self, wanted: Vec<Subscription<Msg>>) {
        let mut wanted: HashMap<SubscriptionId, Subscription<Msg>> =
            wanted.into_iter().map(|sub| (sub.id.clone(), sub)).collect();

        self.active.retain(|id, handle| {
            let keep = wanted.contains_key(id);
            if !keep {
                handle.abort();
            }
            keep
        });

        for (id, sub) in wanted.drain() {
            if !self.active.contains_key(&id) {
                tracing::trace!(?id, "starting subscription");
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort everything.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(id: SubscriptionId) -> Subscription<i32> {
        Subscription::from_stream(id, Box::pin(futures::stream::pending()))
    }

    #[test]
    fn ids_distinguish_type_and_name() {
        assert_eq!(SubscriptionId::of::<String>(), SubscriptionId::of::<String>());
        assert_ne!(SubscriptionId::of::<String>(), SubscriptionId::of::<u8>());
        assert_ne!(
            SubscriptionId::with_str::<String>("autoplay"),
            SubscriptionId::with_str::<String>("frame")
        );
    }

    #[test]
    fn keyed_ids_change_with_generation() {
        let first = SubscriptionId::keyed::<String>("autoplay", 1);
        assert_eq!(first, SubscriptionId::keyed::<String>("autoplay", 1));
        assert_ne!(first, SubscriptionId::keyed::<String>("autoplay", 2));
    }

    #[tokio::test]
    async fn reconcile_starts_keeps_and_stops() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        let id = SubscriptionId::keyed::<String>("timer", 1);

        manager.reconcile(vec![pending(id.clone())]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![pending(id)]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![pending(SubscriptionId::keyed::<String>("timer", 2))]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![]);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn mapped_subscription_relays_messages() {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let stream: BoxStream<'static, i32> = Box::pin(futures::stream::iter([1, 2]));
        let sub = Subscription::from_stream(SubscriptionId::of::<i32>(), stream)
            .map(|n| format!("n={n}"));
        let _handle = (sub.spawn)(tx);

        assert_eq!(rx.recv().await.as_deref(), Some("n=1"));
        assert_eq!(rx.recv().await.as_deref(), Some("n=2"));
    }

    #[tokio::test]
    async fn shutdown_aborts_all() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        manager.reconcile(vec![
            pending(SubscriptionId::new::<String>(1)),
            pending(SubscriptionId::new::<String>(2)),
        ]);
        assert_eq!(manager.active_count(), 2);
        manager.shutdown();
        assert_eq!(manager.active_count(), 0);
    }
}
