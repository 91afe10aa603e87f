use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Terminal events
#[derive(Clone, Debug)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Error occurred
    Error(String),
}

/// Event handler managing terminal input
///
/// The viewer has nothing to poll, so there is no tick: the loop wakes on
/// input, resizes and highlight expiry only.
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        tokio::spawn(async move {
            let mut reader = event::EventStream::new();

            loop {
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = token.cancelled() => break,

                    maybe_event = crossterm_event => {
                        let event = match maybe_event {
                            // Filter out release events (important for Windows)
                            Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                                Event::Key(key)
                            }
                            Some(Ok(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
                            Some(Ok(_)) => continue,
                            Some(Err(e)) => Event::Error(e.to_string()),
                            None => break,
                        };
                        if sender.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("input reader stopped");
        });

        Self { receiver, cancel }
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Shutdown the event handler
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
