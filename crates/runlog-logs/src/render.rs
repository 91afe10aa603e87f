use runlog_types::{Chunk, ClassifiedLine, LogRecord};

use crate::expansion::ExpansionCache;
use crate::indexer::{DiagnosticTree, count_in_range};

/// One chunk as the UI should draw it
#[derive(Clone, Debug)]
pub struct ChunkView<'a> {
    pub chunk: &'a Chunk,
    pub expanded: bool,
    pub error_count: usize,
    pub warning_count: usize,
    /// Classified lines of the chunk; empty while collapsed
    pub lines: &'a [ClassifiedLine],
}

impl ChunkView<'_> {
    /// Header text with 1-based line numbers, e.g. "Lines 21-40"
    pub fn title(&self) -> String {
        format!(
            "Lines {}-{}",
            self.chunk.start_line + 1,
            self.chunk.end_line + 1
        )
    }

    pub fn has_diagnostics(&self) -> bool {
        self.error_count + self.warning_count > 0
    }
}

/// Everything the UI needs to draw the current log
#[derive(Clone, Debug)]
pub struct RenderModel<'a> {
    pub chunks: Vec<ChunkView<'a>>,
    pub tree: DiagnosticTree<'a>,
    pub line_count: usize,
    pub open_count: usize,
    pub max_open: usize,
}

impl<'a> RenderModel<'a> {
    pub fn build(
        record: Option<&'a LogRecord>,
        chunks: &'a [Chunk],
        expansion: &ExpansionCache,
    ) -> Self {
        let Some(record) = record else {
            return Self::empty(expansion);
        };

        let chunks = chunks
            .iter()
            .map(|chunk| {
                let expanded = expansion.is_open(chunk.index);
                ChunkView {
                    chunk,
                    expanded,
                    error_count: count_in_range(&record.errors, chunk.start_line, chunk.end_line),
                    warning_count: count_in_range(
                        &record.warnings,
                        chunk.start_line,
                        chunk.end_line,
                    ),
                    lines: if expanded {
                        &record.lines[chunk.line_range()]
                    } else {
                        &[]
                    },
                }
            })
            .collect();

        Self {
            chunks,
            tree: DiagnosticTree::new(&record.errors, &record.warnings),
            line_count: record.line_count,
            open_count: expansion.len(),
            max_open: expansion.max_open(),
        }
    }

    fn empty(expansion: &ExpansionCache) -> Self {
        Self {
            chunks: Vec::new(),
            tree: DiagnosticTree::empty(),
            line_count: 0,
            open_count: 0,
            max_open: expansion.max_open(),
        }
    }

    /// Nothing to draw; the UI shows an empty state
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
