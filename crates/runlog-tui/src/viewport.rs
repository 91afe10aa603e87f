use std::time::Duration;

use tokio::sync::mpsc;

use runlog_logs::{HighlightExpired, HighlightTimer, Viewport};

/// Terminal-side viewport: remembers where to scroll and drives the
/// highlight timer
pub struct TuiViewport {
    /// Line to scroll to on the next layout pass
    reveal: Option<usize>,

    highlight: HighlightTimer,
}

impl TuiViewport {
    pub fn new(expired_tx: mpsc::UnboundedSender<HighlightExpired>) -> Self {
        Self {
            reveal: None,
            highlight: HighlightTimer::new(expired_tx),
        }
    }

    /// Consume the pending scroll request
    pub fn take_reveal(&mut self) -> Option<usize> {
        self.reveal.take()
    }

    pub fn highlighted_line(&self) -> Option<usize> {
        self.highlight.active_line()
    }

    pub fn highlight_pending(&self) -> bool {
        self.highlight.is_pending()
    }

    /// Apply a timer expiry; returns true if the highlight was removed
    pub fn expire(&mut self, event: HighlightExpired) -> bool {
        self.highlight.expire(event)
    }
}

impl Viewport for TuiViewport {
    fn reveal_line(&mut self, line: usize) {
        self.reveal = Some(line);
    }

    fn apply_temporary_highlight(&mut self, line: usize, duration: Duration) {
        self.highlight.arm(line, duration);
    }

    fn clear_highlight(&mut self) {
        self.reveal = None;
        self.highlight.cancel();
    }
}
