use runlog_types::{Chunk, Diagnostic, ExecutionResponse, LogRecord, NavigationTarget};

use crate::chunker::LogChunker;
use crate::classifier::LineClassifier;
use crate::config::{ConfigError, ViewerConfig};
use crate::expansion::{Expansion, ExpansionCache};
use crate::indexer::{DiagnosticIndexer, DiagnosticTree, by_line};
use crate::navigation::{NavigationController, Viewport};
use crate::payload::parse_response;
use crate::render::RenderModel;

/// The installed log and everything derived from it
#[derive(Clone, Debug)]
pub struct LoadedLog {
    pub response: ExecutionResponse,
    pub record: LogRecord,
    pub chunks: Vec<Chunk>,
}

/// One viewer instance: the current log plus its expansion and navigation
/// state.
pub struct ViewerSession {
    classifier: LineClassifier,
    chunker: LogChunker,
    sentinel: String,
    expansion: ExpansionCache,
    navigation: NavigationController,
    loaded: Option<LoadedLog>,
}

impl ViewerSession {
    pub fn new(config: &ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = LineClassifier::new(&config.markers)?;
        let chunker = LogChunker::new(config.chunk_size)?;

        Ok(Self {
            classifier,
            chunker,
            sentinel: config.sentinel.clone(),
            expansion: ExpansionCache::new(config.max_open)?,
            navigation: NavigationController::new(chunker, config.highlight_duration()),
            loaded: None,
        })
    }

    /// Install an execution response, replacing the current log
    pub fn install_payload(&mut self, payload: &str, viewport: &mut impl Viewport) -> &LoadedLog {
        let response = parse_response(payload, &self.sentinel);
        self.install(response, viewport)
    }

    /// Install a bare log with no sentinel framing
    pub fn install_log(&mut self, raw: &str, viewport: &mut impl Viewport) -> &LoadedLog {
        self.install(ExecutionResponse::opaque(raw), viewport)
    }

    fn install(&mut self, response: ExecutionResponse, viewport: &mut impl Viewport) -> &LoadedLog {
        let lines = self.classifier.classify(&response.log);
        let index = DiagnosticIndexer::index(&lines);
        let chunks = self.chunker.chunk(&lines);
        let record = LogRecord::new(response.log.clone(), lines, index.errors, index.warnings);

        tracing::debug!(
            lines = record.line_count,
            errors = record.errors.len(),
            warnings = record.warnings.len(),
            chunks = chunks.len(),
            "installed log"
        );

        self.navigation.cancel();
        viewport.clear_highlight();
        self.expansion.initialize(chunks.len());

        self.loaded.insert(LoadedLog {
            response,
            record,
            chunks,
        })
    }

    /// Drop the current log
    pub fn clear(&mut self, viewport: &mut impl Viewport) {
        self.loaded = None;
        self.navigation.cancel();
        viewport.clear_highlight();
        self.expansion.initialize(0);
    }

    pub fn loaded(&self) -> Option<&LoadedLog> {
        self.loaded.as_ref()
    }

    pub fn record(&self) -> Option<&LogRecord> {
        self.loaded.as_ref().map(|l| &l.record)
    }

    pub fn response(&self) -> Option<&ExecutionResponse> {
        self.loaded.as_ref().map(|l| &l.response)
    }

    pub fn chunks(&self) -> &[Chunk] {
        self.loaded
            .as_ref()
            .map(|l| l.chunks.as_slice())
            .unwrap_or_default()
    }

    pub fn line_count(&self) -> usize {
        self.record().map_or(0, |r| r.line_count)
    }

    pub fn expansion(&self) -> &ExpansionCache {
        &self.expansion
    }

    pub fn chunker(&self) -> LogChunker {
        self.chunker
    }

    pub fn chunk_index_of(&self, line: usize) -> usize {
        self.chunker.chunk_index_of(line)
    }

    pub fn toggle_chunk(&mut self, index: usize) -> Expansion {
        self.expansion.toggle(index)
    }

    pub fn reveal_chunk(&mut self, index: usize) -> Expansion {
        self.expansion.reveal(index)
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.expansion.is_open(index)
    }

    /// Reveal and highlight a diagnostic's line
    pub fn go_to_diagnostic(
        &mut self,
        diagnostic: &Diagnostic,
        viewport: &mut impl Viewport,
    ) -> Option<NavigationTarget> {
        let line_count = self.line_count();
        self.navigation
            .go_to_diagnostic(diagnostic, line_count, &mut self.expansion, viewport)
    }

    /// Navigate to the error with the given sequence id
    pub fn go_to_error(
        &mut self,
        sequence_id: usize,
        viewport: &mut impl Viewport,
    ) -> Option<NavigationTarget> {
        let diagnostic = self.record()?.errors.get(sequence_id)?.clone();
        self.go_to_diagnostic(&diagnostic, viewport)
    }

    /// Navigate to the warning with the given sequence id
    pub fn go_to_warning(
        &mut self,
        sequence_id: usize,
        viewport: &mut impl Viewport,
    ) -> Option<NavigationTarget> {
        let diagnostic = self.record()?.warnings.get(sequence_id)?.clone();
        self.go_to_diagnostic(&diagnostic, viewport)
    }

    /// First diagnostic (of either kind) strictly after `line`
    pub fn next_diagnostic(&self, line: Option<usize>) -> Option<Diagnostic> {
        let record = self.record()?;
        by_line(&record.errors, &record.warnings)
            .into_iter()
            .find(|d| line.is_none_or(|l| d.line > l))
            .cloned()
    }

    /// Last diagnostic (of either kind) strictly before `line`
    pub fn previous_diagnostic(&self, line: Option<usize>) -> Option<Diagnostic> {
        let record = self.record()?;
        by_line(&record.errors, &record.warnings)
            .into_iter()
            .rev()
            .find(|d| line.is_none_or(|l| d.line < l))
            .cloned()
    }

    /// Consume the pending navigation target
    pub fn take_navigation_target(&mut self) -> Option<NavigationTarget> {
        self.navigation.take_target()
    }

    pub fn navigation_target(&self) -> Option<&NavigationTarget> {
        self.navigation.target()
    }

    /// Markup-free text of a chunk, for the clipboard
    pub fn chunk_plain_text(&self, index: usize) -> Option<&str> {
        self.chunks().get(index).map(|c| c.text.as_str())
    }

    pub fn diagnostic_tree(&self) -> DiagnosticTree<'_> {
        match self.record() {
            Some(record) => DiagnosticTree::new(&record.errors, &record.warnings),
            None => DiagnosticTree::empty(),
        }
    }

    pub fn render_model(&self) -> RenderModel<'_> {
        RenderModel::build(self.record(), self.chunks(), &self.expansion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SENTINEL;
    use crate::navigation::tests::{RecordingViewport, error_at};
    use runlog_types::PayloadFormat;

    fn config(chunk_size: usize) -> ViewerConfig {
        ViewerConfig {
            chunk_size,
            ..ViewerConfig::default()
        }
    }

    /// 45 lines with an error on line 25 and a warning on line 3
    fn sample_log() -> String {
        (0..45)
            .map(|i| match i {
                3 => "WARNING: check this".to_string(),
                25 => "ERROR: broke here".to_string(),
                _ => format!("NOTE: line {i}"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        assert!(matches!(
            ViewerSession::new(&config(0)),
            Err(ConfigError::ZeroChunkSize)
        ));
    }

    #[test]
    fn test_sample_scenario() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();

        let loaded = session.install_log(&sample_log(), &mut viewport);
        assert_eq!(loaded.record.line_count, 45);
        assert_eq!(loaded.chunks.len(), 3);
        assert_eq!(session.expansion().open_indices().collect::<Vec<_>>(), vec![2]);

        let target = session.go_to_error(0, &mut viewport).unwrap();
        assert_eq!(target.chunk_index, 1);
        assert_eq!(
            session.expansion().open_indices().collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(viewport.highlighted[0].0, 25);
    }

    #[test]
    fn test_install_resets_state() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();

        session.install_log(&sample_log(), &mut viewport);
        session.toggle_chunk(0);
        session.go_to_warning(0, &mut viewport);
        assert!(session.navigation_target().is_some());

        session.install_log("ERROR: only line", &mut viewport);
        assert!(session.navigation_target().is_none());
        assert_eq!(session.expansion().open_indices().collect::<Vec<_>>(), vec![0]);
        assert_eq!(viewport.cleared, 2);
    }

    #[test]
    fn test_install_payload_uses_log_segment() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();

        let payload = format!("{{}}{DEFAULT_SENTINEL}ERROR: inside{DEFAULT_SENTINEL}printed");
        let loaded = session.install_payload(&payload, &mut viewport);
        assert_eq!(loaded.response.format, PayloadFormat::ThreePart);
        assert_eq!(loaded.record.errors.len(), 1);
        assert_eq!(loaded.response.print_output, "printed");
    }

    #[test]
    fn test_payload_without_sentinel() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();

        let loaded = session.install_payload("WARNING: raw\nplain", &mut viewport);
        assert_eq!(loaded.response.format, PayloadFormat::Opaque);
        assert_eq!(loaded.record.warnings.len(), 1);
        assert_eq!(loaded.record.line_count, 2);
    }

    #[test]
    fn test_empty_log() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();

        session.install_log("", &mut viewport);
        let model = session.render_model();
        assert!(model.is_empty());
        assert!(model.tree.is_empty());
        assert!(session.expansion().is_empty());
        assert!(session.go_to_error(0, &mut viewport).is_none());
    }

    #[test]
    fn test_stale_diagnostic_is_noop() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();

        session.install_log("a\nb", &mut viewport);
        assert!(session.go_to_diagnostic(&error_at(40), &mut viewport).is_none());
        assert!(viewport.highlighted.is_empty());
    }

    #[test]
    fn test_render_model() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();
        session.install_log(&sample_log(), &mut viewport);

        let model = session.render_model();
        assert_eq!(model.chunks.len(), 3);
        assert_eq!(model.line_count, 45);
        assert_eq!(model.open_count, 1);
        assert_eq!(model.max_open, 2);

        let first = &model.chunks[0];
        assert!(!first.expanded);
        assert!(first.lines.is_empty());
        assert_eq!(first.warning_count, 1);
        assert_eq!(first.title(), "Lines 1-20");

        let middle = &model.chunks[1];
        assert_eq!(middle.error_count, 1);

        let last = &model.chunks[2];
        assert!(last.expanded);
        assert_eq!(last.lines.len(), 5);
        assert_eq!(last.lines[0].index, 40);
        assert_eq!(model.tree.len(), 2);
    }

    #[test]
    fn test_chunk_plain_text_strips_markup() {
        let mut session = ViewerSession::new(&config(2)).unwrap();
        let mut viewport = RecordingViewport::default();
        session.install_log(
            "a\n<span class=\"log-error\">ERROR: b</span>\nc",
            &mut viewport,
        );

        assert_eq!(session.chunk_plain_text(0), Some("a\nERROR: b"));
        assert_eq!(session.chunk_plain_text(1), Some("c"));
        assert_eq!(session.chunk_plain_text(2), None);
    }

    #[test]
    fn test_diagnostic_stepping() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();
        session.install_log(&sample_log(), &mut viewport);

        assert_eq!(session.next_diagnostic(None).map(|d| d.line), Some(3));
        assert_eq!(session.next_diagnostic(Some(3)).map(|d| d.line), Some(25));
        assert_eq!(session.next_diagnostic(Some(25)), None);
        assert_eq!(session.previous_diagnostic(Some(25)).map(|d| d.line), Some(3));
        assert_eq!(session.previous_diagnostic(None).map(|d| d.line), Some(25));
    }

    #[test]
    fn test_clear() {
        let mut session = ViewerSession::new(&config(20)).unwrap();
        let mut viewport = RecordingViewport::default();
        session.install_log(&sample_log(), &mut viewport);

        session.clear(&mut viewport);
        assert!(session.record().is_none());
        assert!(session.render_model().is_empty());
        assert!(session.expansion().is_empty());
    }
}
