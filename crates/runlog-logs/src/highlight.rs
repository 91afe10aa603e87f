use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Sent when a highlight's revert timer fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightExpired {
    pub line: usize,
    pub generation: u64,
}

struct ActiveHighlight {
    line: usize,
    generation: u64,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

/// Single-flight timer for temporary line highlights.
///
/// At most one highlight is active and at most one revert timer is pending.
/// Arming a new highlight cancels the previous timer. Expiry arrives as a
/// [`HighlightExpired`] message that the owner feeds back into [`expire`].
///
/// [`expire`]: HighlightTimer::expire
pub struct HighlightTimer {
    tx: mpsc::UnboundedSender<HighlightExpired>,
    active: Option<ActiveHighlight>,
    next_generation: u64,
}

impl HighlightTimer {
    pub fn new(tx: mpsc::UnboundedSender<HighlightExpired>) -> Self {
        Self {
            tx,
            active: None,
            next_generation: 0,
        }
    }

    /// Highlight `line` for `duration`, replacing any pending highlight.
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, line: usize, duration: Duration) -> u64 {
        self.cancel();

        self.next_generation += 1;
        let generation = self.next_generation;
        let cancel = CancellationToken::new();

        let task = {
            let cancel = cancel.clone();
            let tx = self.tx.clone();

            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(duration) => {
                        let _ = tx.send(HighlightExpired { line, generation });
                    }
                }
            })
        };

        self.active = Some(ActiveHighlight {
            line,
            generation,
            cancel,
            task,
        });
        generation
    }

    /// Drop the active highlight and its timer
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            active.task.abort();
        }
    }

    /// Apply an expiry. Returns true if it cleared the active highlight;
    /// stale expiries from replaced highlights are ignored.
    pub fn expire(&mut self, event: HighlightExpired) -> bool {
        match &self.active {
            Some(active) if active.generation == event.generation => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Line currently highlighted
    pub fn active_line(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.line)
    }

    /// Whether a revert timer is pending
    pub fn is_pending(&self) -> bool {
        self.active.as_ref().is_some_and(|a| !a.task.is_finished())
    }

    pub fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.generation)
    }
}

impl Drop for HighlightTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_duration() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = HighlightTimer::new(tx);
        let start = Instant::now();

        let generation = timer.arm(7, Duration::from_millis(3000));
        assert_eq!(timer.active_line(), Some(7));

        let event = rx.recv().await.unwrap();
        assert_eq!(event, HighlightExpired { line: 7, generation });
        assert!(start.elapsed() >= Duration::from_millis(3000));

        assert!(timer.expire(event));
        assert_eq!(timer.active_line(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = HighlightTimer::new(tx);
        let start = Instant::now();

        timer.arm(5, Duration::from_millis(3000));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let second = timer.arm(9, Duration::from_millis(3000));

        assert_eq!(timer.active_line(), Some(9));
        assert!(timer.is_pending());

        // Only the second timer fires, 3s after it was armed
        let event = rx.recv().await.unwrap();
        assert_eq!(event.generation, second);
        assert_eq!(event.line, 9);
        assert!(start.elapsed() >= Duration::from_millis(4000));
        assert!(timer.expire(event));

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_expiry_ignored() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut timer = HighlightTimer::new(tx);

        let first = timer.arm(1, Duration::from_millis(3000));
        timer.arm(2, Duration::from_millis(3000));

        assert!(!timer.expire(HighlightExpired {
            line: 1,
            generation: first
        }));
        assert_eq!(timer.active_line(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = HighlightTimer::new(tx);

        timer.arm(3, Duration::from_millis(3000));
        timer.cancel();
        assert_eq!(timer.active_line(), None);
        assert!(!timer.is_pending());

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(rx.try_recv().is_err());
    }
}
