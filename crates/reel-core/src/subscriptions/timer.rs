use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};

/// A repeating timer.
///
/// The first tick arrives one full `interval` after the subscription starts,
/// like a browser `setInterval`, not immediately. Restarting the timer (see
/// [`Every::generation`]) starts a new period from scratch.
///
/// ```rust,ignore
/// let sub = subscribe(Every::new(Duration::from_secs(5), "autoplay").generation(self.autoplay_run))
///     .map(|_| Message::AutoplayTick);
/// ```
pub struct Every {
    /// Time between ticks.
    pub interval: Duration,
    /// Name distinguishing this timer from others of the same owner.
    pub id: &'static str,
    /// Restart counter folded into the subscription id.
    pub generation: u64,
}

impl Every {
    /// Create a repeating timer with the given interval and name.
    pub fn new(interval: Duration, id: &'static str) -> Self {
        Self {
            interval,
            id,
            generation: 0,
        }
    }

    /// Tag the timer with a restart counter. A different value is a different
    /// subscription, so the runtime stops the old timer and starts a new one.
    pub fn generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::keyed::<Self>(self.id, self.generation)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let period = self.interval.max(Duration::from_millis(1));
        let start = tokio::time::Instant::now() + period;
        let ticks = tokio_stream::wrappers::IntervalStream::new(tokio::time::interval_at(
            start, period,
        ))
        .map(|tick| tick.into_std());
        Box::pin(ticks)
    }
}

/// A one-shot delay that fires once and completes.
pub struct After {
    /// How long to wait.
    pub duration: Duration,
}

impl After {
    /// Create a one-shot delay.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl SubscriptionSource for After {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.duration.as_nanos() as u64)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let duration = self.duration;
        Box::pin(futures::stream::once(async move {
            tokio::time::sleep(duration).await;
            Instant::now()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_changes_identity() {
        let a = Every::new(Duration::from_secs(5), "autoplay");
        let b = Every::new(Duration::from_secs(5), "autoplay").generation(1);
        assert_ne!(a.id(), b.id());
        assert_eq!(b.id(), Every::new(Duration::from_secs(1), "autoplay").generation(1).id());
    }

    #[tokio::test(start_paused = true)]
    async fn every_waits_one_period_before_first_tick() {
        let started = tokio::time::Instant::now();
        let mut ticks = Every::new(Duration::from_millis(500), "t").stream();
        ticks.next().await;
        assert!(started.elapsed() >= Duration::from_millis(500));
        ticks.next().await;
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn after_fires_once() {
        let mut once = After::new(Duration::from_millis(250)).stream();
        assert!(once.next().await.is_some());
        assert!(once.next().await.is_none());
    }
}
