//! Cancellable periodic tick source for autoplay.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Shortest period a ticker runs at.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A running periodic timer.
///
/// Each tick sends the ticker's generation over the channel so the
/// receiver can discard ticks from a timer it has already replaced.
/// Dropping the `Ticker` aborts the task; holding it is what keeps the
/// timer alive.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    period: Duration,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Start ticking every `period`. The first tick fires one full period
    /// from now. A zero period is raised to one millisecond. Must be called
    /// inside a tokio runtime.
    pub fn spawn(generation: u64, period: Duration, tx: mpsc::Sender<u64>) -> Self {
        let period = period.max(MIN_PERIOD);
        tracing::debug!(generation, ?period, "starting autoplay ticker");

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(generation).await.is_err() {
                    break;
                }
            }
        });

        Self {
            generation,
            period,
            handle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the task has exited (receiver gone or aborted).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        tracing::debug!(generation = self.generation, "stopping autoplay ticker");
        self.handle.abort();
    }
}

/// The autoplay timer slot of one session.
///
/// Holds at most one [`Ticker`]. [`sync`](Autoplay::sync) acquires a ticker
/// while playback is running, swaps it when the period changes and releases
/// it as soon as playback stops. Dropping the slot releases whatever it
/// holds.
#[derive(Debug, Default)]
pub struct Autoplay {
    ticker: Option<Ticker>,
    generation: u64,
}

impl Autoplay {
    /// Bring the timer in line with the desired state: `Some(period)` while
    /// playing, `None` when stopped. A ticker whose task has exited counts
    /// as absent and is replaced.
    pub fn sync(&mut self, desired: Option<Duration>, tx: &mpsc::Sender<u64>) {
        match desired {
            None => self.ticker = None,
            Some(period) => {
                match self.ticker.as_ref() {
                    Some(t) if t.is_finished() => {
                        tracing::warn!(
                            generation = t.generation(),
                            "autoplay ticker exited, restarting"
                        );
                    }
                    Some(t) if t.period() == period.max(MIN_PERIOD) => return,
                    _ => {}
                }
                self.generation += 1;
                // Replacing the slot drops (and aborts) the old ticker.
                self.ticker = Some(Ticker::spawn(self.generation, period, tx.clone()));
            }
        }
    }

    /// Whether a tick came from the ticker currently held.
    pub fn is_current(&self, generation: u64) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|t| t.generation() == generation)
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_after_each_period() {
        let (tx, mut rx) = mpsc::channel(4);
        let ticker = Ticker::spawn(7, Duration::from_millis(500), tx);

        let start = Instant::now();
        assert_eq!(rx.recv().await, Some(7));
        let first = start.elapsed();
        assert!(first >= Duration::from_millis(500) && first < Duration::from_millis(510));
        assert_eq!(rx.recv().await, Some(7));
        assert!(start.elapsed() >= Duration::from_millis(1000));

        drop(ticker);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(4);
        let ticker = Ticker::spawn(1, Duration::from_millis(100), tx);
        assert_eq!(rx.recv().await, Some(1));

        drop(ticker);

        // The aborted task drops its sender, closing the channel.
        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        let ticker = Ticker::spawn(2, Duration::from_millis(10), tx);
        drop(rx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(ticker.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_discards_replaced_ticker() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut autoplay = Autoplay::default();

        autoplay.sync(Some(Duration::from_millis(100)), &tx);
        let first = rx.recv().await.unwrap();
        assert!(autoplay.is_current(first));

        autoplay.sync(Some(Duration::from_millis(50)), &tx);
        assert!(!autoplay.is_current(first));
        let second = rx.recv().await.unwrap();
        assert!(autoplay.is_current(second));

        // Same period keeps the running ticker.
        autoplay.sync(Some(Duration::from_millis(50)), &tx);
        assert!(autoplay.is_current(second));

        autoplay.sync(None, &tx);
        assert!(!autoplay.is_running());
        assert!(!autoplay.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_restarts_exited_ticker() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut autoplay = Autoplay::default();
        let period = Duration::from_millis(100);

        autoplay.sync(Some(period), &tx);
        let first = rx.recv().await.unwrap();

        let dead = autoplay.ticker.as_ref().unwrap();
        dead.handle.abort();
        while !dead.is_finished() {
            tokio::task::yield_now().await;
        }

        autoplay.sync(Some(period), &tx);
        assert!(!autoplay.is_current(first));
        let second = rx.recv().await.unwrap();
        assert_ne!(second, first);
        assert!(autoplay.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_still_ticks() {
        let (tx, mut rx) = mpsc::channel(4);
        let ticker = Ticker::spawn(3, Duration::ZERO, tx);
        assert_eq!(ticker.period(), MIN_PERIOD);
        assert_eq!(rx.recv().await, Some(3));
    }
}
