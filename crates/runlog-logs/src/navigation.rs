use std::time::Duration;

use runlog_types::{Diagnostic, NavigationTarget};

use crate::chunker::LogChunker;
use crate::expansion::ExpansionCache;

/// Rendering side effects requested by navigation.
///
/// Implementations scroll and style whatever surface shows the log; the core
/// only emits intents through this trait.
pub trait Viewport {
    /// Bring a line into view
    fn reveal_line(&mut self, line: usize);

    /// Highlight a line, reverting after `duration`. Replaces any pending
    /// highlight.
    fn apply_temporary_highlight(&mut self, line: usize, duration: Duration);

    /// Drop any active highlight and its pending revert
    fn clear_highlight(&mut self);
}

/// Maps diagnostics to chunks and drives reveal + highlight
#[derive(Clone, Debug)]
pub struct NavigationController {
    chunker: LogChunker,
    highlight: Duration,
    target: Option<NavigationTarget>,
}

impl NavigationController {
    pub fn new(chunker: LogChunker, highlight: Duration) -> Self {
        Self {
            chunker,
            highlight,
            target: None,
        }
    }

    /// Open the chunk holding `diagnostic` and ask the viewport to show and
    /// highlight its line.
    ///
    /// Returns `None` without touching anything when the line lies outside
    /// the current log.
    pub fn go_to_diagnostic(
        &mut self,
        diagnostic: &Diagnostic,
        line_count: usize,
        cache: &mut ExpansionCache,
        viewport: &mut impl Viewport,
    ) -> Option<NavigationTarget> {
        let chunk_index = self.chunker.chunk_index_of(diagnostic.line);
        if diagnostic.line >= line_count || chunk_index >= cache.chunk_count() {
            tracing::debug!(
                line = diagnostic.line,
                line_count,
                "diagnostic outside current log, ignoring"
            );
            return None;
        }

        let expansion = cache.reveal(chunk_index);
        tracing::debug!(
            line = diagnostic.line,
            chunk = chunk_index,
            ?expansion,
            "navigating to diagnostic"
        );

        let target = NavigationTarget {
            diagnostic: diagnostic.clone(),
            chunk_index,
        };
        viewport.reveal_line(diagnostic.line);
        viewport.apply_temporary_highlight(diagnostic.line, self.highlight);
        self.target = Some(target.clone());

        Some(target)
    }

    /// Consume the pending target
    pub fn take_target(&mut self) -> Option<NavigationTarget> {
        self.target.take()
    }

    pub fn target(&self) -> Option<&NavigationTarget> {
        self.target.as_ref()
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }

    pub fn chunker(&self) -> LogChunker {
        self.chunker
    }

    pub fn highlight_duration(&self) -> Duration {
        self.highlight
    }
}
