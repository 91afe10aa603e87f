use std::io::{self, Write};

use runlog_logs::{Diagnostic, DiagnosticKind, Expansion, HighlightExpired, ViewerSession};
use runlog_types::NavigationTarget;

use super::rows::{LogRow, log_rows, row_of_chunk, row_of_line};
use crate::clipboard::copy_osc52;
use crate::viewport::TuiViewport;

/// Which pane receives cursor keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Log,
    Diagnostics,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::Log => Self::Diagnostics,
            Self::Diagnostics => Self::Log,
        }
    }
}

/// UI-specific transient state
pub struct UiState {
    /// Focused pane
    pub focus: Focus,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// Feedback from the last action
    pub status_message: Option<String>,

    /// Selected entry in the diagnostics tree (flat position)
    pub tree_selection: usize,

    /// Scroll offset for the diagnostics tree viewport
    pub tree_scroll: usize,

    /// Cursor row in the log pane
    pub log_cursor: usize,

    /// First visible row in the log pane
    pub log_scroll: usize,

    /// Rows visible in the log pane at the last render
    pub log_height: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Focus::default(),
            help_visible: false,
            error_message: None,
            status_message: None,
            tree_selection: 0,
            tree_scroll: 0,
            log_cursor: 0,
            log_scroll: 0,
            log_height: 20,
        }
    }
}

/// Global application state
pub struct AppState {
    /// Log, expansion and navigation state
    pub session: ViewerSession,

    /// Scroll and highlight side of navigation
    pub viewport: TuiViewport,

    /// UI state
    pub ui_state: UiState,

    /// Where the log came from (file name)
    pub source_name: String,

    /// Whether app should quit
    pub should_quit: bool,

    /// Dirty flag for rendering - only render when true
    pub render_dirty: bool,
}

impl AppState {
    pub fn new(session: ViewerSession, viewport: TuiViewport, source_name: impl Into<String>) -> Self {
        Self {
            session,
            viewport,
            ui_state: UiState::default(),
            source_name: source_name.into(),
            should_quit: false,
            render_dirty: true,
        }
    }

    /// Install an execution response
    pub fn install_payload(&mut self, payload: &str) {
        self.session.install_payload(payload, &mut self.viewport);
        self.reset_view();
    }

    /// Install a bare log
    pub fn install_log(&mut self, raw: &str) {
        self.session.install_log(raw, &mut self.viewport);
        self.reset_view();
    }

    fn reset_view(&mut self) {
        self.ui_state.tree_selection = 0;
        self.ui_state.tree_scroll = 0;
        self.ui_state.status_message = None;
        self.ui_state.log_scroll = 0;

        // Start on the header of the pre-expanded last chunk
        let rows = self.rows();
        self.ui_state.log_cursor = self
            .session
            .chunks()
            .len()
            .checked_sub(1)
            .and_then(|last| row_of_chunk(&rows, last))
            .unwrap_or(0);
        self.scroll_to_cursor();
        self.render_dirty = true;
    }

    /// Rows of the log pane for the current expansion state
    pub fn rows(&self) -> Vec<LogRow> {
        log_rows(&self.session.render_model())
    }

    /// Number of selectable diagnostics
    pub fn tree_len(&self) -> usize {
        self.session.diagnostic_tree().len()
    }

    pub fn selected_diagnostic(&self) -> Option<Diagnostic> {
        self.session
            .diagnostic_tree()
            .get(self.ui_state.tree_selection)
            .cloned()
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.error_message = Some(msg);
        self.render_dirty = true;
    }

    /// Dismiss the error message
    pub fn dismiss_error(&mut self) {
        self.ui_state.error_message = None;
    }

    pub fn toggle_help(&mut self) {
        self.ui_state.help_visible = !self.ui_state.help_visible;
    }

    pub fn focus_next(&mut self) {
        self.ui_state.focus = self.ui_state.focus.next();
    }

    /// Move the cursor of the focused pane up
    pub fn cursor_up(&mut self, n: usize) {
        match self.ui_state.focus {
            Focus::Diagnostics => {
                self.ui_state.tree_selection = self.ui_state.tree_selection.saturating_sub(n);
            }
            Focus::Log => {
                self.ui_state.log_cursor = self.ui_state.log_cursor.saturating_sub(n);
                self.scroll_to_cursor();
            }
        }
    }

    /// Move the cursor of the focused pane down
    pub fn cursor_down(&mut self, n: usize) {
        match self.ui_state.focus {
            Focus::Diagnostics => {
                let last = self.tree_len().saturating_sub(1);
                self.ui_state.tree_selection = (self.ui_state.tree_selection + n).min(last);
            }
            Focus::Log => {
                let last = self.rows().len().saturating_sub(1);
                self.ui_state.log_cursor = (self.ui_state.log_cursor + n).min(last);
                self.scroll_to_cursor();
            }
        }
    }

    pub fn page_up(&mut self) {
        self.cursor_up(self.ui_state.log_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.cursor_down(self.ui_state.log_height.max(1));
    }

    pub fn cursor_top(&mut self) {
        self.cursor_up(usize::MAX);
    }

    pub fn cursor_bottom(&mut self) {
        self.cursor_down(usize::MAX / 2);
    }

    /// Enter: jump to the selected diagnostic, or toggle the chunk under
    /// the log cursor
    pub fn activate(&mut self) {
        match self.ui_state.focus {
            Focus::Diagnostics => {
                if let Some(diagnostic) = self.selected_diagnostic() {
                    self.go_to(&diagnostic);
                }
            }
            Focus::Log => self.toggle_chunk_at_cursor(),
        }
    }

    /// Navigate to a diagnostic: expand its chunk, move the cursor onto its
    /// line and highlight it
    pub fn go_to(&mut self, diagnostic: &Diagnostic) -> bool {
        if self
            .session
            .go_to_diagnostic(diagnostic, &mut self.viewport)
            .is_none()
        {
            self.ui_state.status_message =
                Some(format!("Line {} is not in this log", diagnostic.line + 1));
            return false;
        }

        if let Some(line) = self.viewport.take_reveal() {
            self.focus_line(line);
        }
        if let Some(target) = self.session.take_navigation_target() {
            self.sync_tree_selection(&target);
            self.ui_state.status_message = Some(describe(&target));
        }
        self.render_dirty = true;
        true
    }

    /// Toggle the chunk owning the cursor row, keeping the cursor on its
    /// header
    pub fn toggle_chunk_at_cursor(&mut self) {
        let Some(chunk) = self.cursor_row().map(|r| r.chunk()) else {
            return;
        };

        let outcome = self.session.toggle_chunk(chunk);
        let rows = self.rows();
        if let Some(row) = row_of_chunk(&rows, chunk) {
            self.ui_state.log_cursor = row;
        }
        self.scroll_to_cursor();

        self.ui_state.status_message = match outcome {
            Expansion::Opened {
                evicted: Some(evicted),
            } => self.session.chunks().get(evicted).map(|c| {
                format!(
                    "Collapsed lines {}-{} (max {} open)",
                    c.start_line + 1,
                    c.end_line + 1,
                    self.session.expansion().max_open()
                )
            }),
            _ => None,
        };
        self.render_dirty = true;
    }

    /// Jump to the next diagnostic below the cursor
    pub fn next_diagnostic(&mut self) {
        let from = match self.anchor() {
            Some(Anchor::Line(line)) => Some(line),
            Some(Anchor::ChunkStart(start)) => start.checked_sub(1),
            None => None,
        };
        match self.session.next_diagnostic(from) {
            Some(diagnostic) => {
                self.go_to(&diagnostic);
            }
            None => self.ui_state.status_message = Some("No more diagnostics".to_string()),
        }
    }

    /// Jump to the previous diagnostic above the cursor
    pub fn prev_diagnostic(&mut self) {
        let from = match self.anchor() {
            Some(Anchor::Line(line) | Anchor::ChunkStart(line)) => Some(line),
            None => None,
        };
        match self.session.previous_diagnostic(from) {
            Some(diagnostic) => {
                self.go_to(&diagnostic);
            }
            None => self.ui_state.status_message = Some("No earlier diagnostics".to_string()),
        }
    }

    /// Copy the plain text of the chunk under the cursor
    pub fn copy_chunk(&mut self, out: &mut impl Write) -> io::Result<()> {
        let Some(index) = self.cursor_row().map(|r| r.chunk()) else {
            return Ok(());
        };
        let Some(chunk) = self.session.chunks().get(index) else {
            return Ok(());
        };

        copy_osc52(out, &chunk.text)?;
        let message = format!(
            "Copied lines {}-{} to clipboard",
            chunk.start_line + 1,
            chunk.end_line + 1
        );
        self.ui_state.status_message = Some(message);
        Ok(())
    }

    /// Feed a highlight timer expiry back in
    pub fn on_highlight_expired(&mut self, event: HighlightExpired) {
        if self.viewport.expire(event) {
            self.render_dirty = true;
        }
    }

    /// Adjust the log scroll so the cursor row is visible
    pub fn scroll_to_cursor(&mut self) {
        let height = self.ui_state.log_height.max(1);
        let cursor = self.ui_state.log_cursor;
        if cursor < self.ui_state.log_scroll {
            self.ui_state.log_scroll = cursor;
        } else if cursor >= self.ui_state.log_scroll + height {
            self.ui_state.log_scroll = cursor + 1 - height;
        }
    }

    fn cursor_row(&self) -> Option<LogRow> {
        self.rows().get(self.ui_state.log_cursor).copied()
    }

    /// Position used as the starting point for diagnostic stepping
    fn anchor(&self) -> Option<Anchor> {
        if self.ui_state.focus == Focus::Diagnostics {
            return self.selected_diagnostic().map(|d| Anchor::Line(d.line));
        }
        match self.cursor_row()? {
            LogRow::Line { line, .. } => Some(Anchor::Line(line)),
            LogRow::Header { chunk } => self
                .session
                .chunks()
                .get(chunk)
                .map(|c| Anchor::ChunkStart(c.start_line)),
        }
    }

    fn focus_line(&mut self, line: usize) {
        let rows = self.rows();
        if let Some(row) = row_of_line(&rows, line) {
            self.ui_state.log_cursor = row;
            // Center the line
            self.ui_state.log_scroll = row.saturating_sub(self.ui_state.log_height / 2);
        }
    }

    fn sync_tree_selection(&mut self, target: &NavigationTarget) {
        if let Some(position) = self
            .session
            .diagnostic_tree()
            .entries()
            .position(|d| *d == target.diagnostic)
        {
            self.ui_state.tree_selection = position;
        }
    }
}

enum Anchor {
    Line(usize),
    ChunkStart(usize),
}

fn describe(target: &NavigationTarget) -> String {
    let kind = match target.diagnostic.kind {
        DiagnosticKind::Error => "Error",
        DiagnosticKind::Warning => "Warning",
    };
    format!(
        "{} #{} at line {}",
        kind,
        target.diagnostic.sequence_id + 1,
        target.line() + 1
    )
}
