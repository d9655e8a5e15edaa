//! Trailing-edge debounce on the Tokio timer.
//!
//! A [`Debouncer`] owns at most one pending timer. Pushing a value aborts the
//! pending timer and starts a new one; the value is emitted only once the
//! delay elapses without another push. Emissions from superseded timers that
//! raced the abort are discarded by generation number.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delay applied to free-text numeric inputs before they reach the URL.
pub const DEFAULT_INPUT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Delays a fast-changing value until it stops changing.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<(u64, T)>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            generation: 0,
            pending: None,
            tx,
            rx,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, cancelling whatever was pending.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let generation = self.generation;
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver lives as long as the debouncer
            let _ = tx.send((generation, value));
        }));
    }

    /// Drop the pending emission, if any.
    ///
    /// A value from a timer that already fired is drained as well.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
        while self.rx.try_recv().is_ok() {}
    }

    /// Whether a value is waiting for its delay to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished()) || !self.rx.is_empty()
    }

    /// Wait for the next settled value.
    ///
    /// Never resolves while nothing is pending, which makes it suitable as a
    /// branch of `tokio::select!`.
    pub async fn settled(&mut self) -> T {
        loop {
            // `self` holds a sender, so the channel never closes
            let Some((generation, value)) = self.rx.recv().await else {
                std::future::pending::<()>().await;
                continue;
            };
            if generation == self.generation {
                self.pending = None;
                return value;
            }
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    #[tokio::test(start_paused = true)]
    async fn test_rapid_updates_emit_last_value_once() {
        let mut debouncer = Debouncer::new(DEFAULT_INPUT_DEBOUNCE);

        debouncer.push("1");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("12");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("120");

        let value = timeout(Duration::from_millis(500), debouncer.settled()).await;
        assert_eq!(value, Ok("120"));

        let again = timeout(Duration::from_secs(5), debouncer.settled()).await;
        assert!(again.is_err(), "only one value should be emitted");
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_not_emitted_before_delay() {
        let mut debouncer = Debouncer::new(Duration::from_millis(400));
        debouncer.push(7);

        let early = timeout(Duration::from_millis(399), debouncer.settled()).await;
        assert!(early.is_err());
        assert!(debouncer.is_pending());

        let late = timeout(Duration::from_millis(10), debouncer.settled()).await;
        assert_eq!(late, Ok(7));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_pauses_emit_separately() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        debouncer.push(1);
        assert_eq!(debouncer.settled().await, 1);
        debouncer.push(2);
        assert_eq!(debouncer.settled().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.push(1);
        sleep(Duration::from_millis(100)).await;
        // The timer already fired; cancelling must still drop its value
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        let result = timeout(Duration::from_secs(1), debouncer.settled()).await;
        assert!(result.is_err());
    }
}
