use runlog_logs::RenderModel;

/// One screen row in the log pane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogRow {
    /// Chunk header (always shown)
    Header { chunk: usize },
    /// A line of an expanded chunk
    Line { chunk: usize, line: usize },
}

impl LogRow {
    pub fn chunk(&self) -> usize {
        match self {
            Self::Header { chunk } | Self::Line { chunk, .. } => *chunk,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Header { .. } => None,
            Self::Line { line, .. } => Some(*line),
        }
    }
}

/// Flatten the render model into rows: one header per chunk, followed by
/// its lines when expanded
pub fn log_rows(model: &RenderModel) -> Vec<LogRow> {
    let mut rows = Vec::with_capacity(model.chunks.len());
    for view in &model.chunks {
        let chunk = view.chunk.index;
        rows.push(LogRow::Header { chunk });
        rows.extend(view.lines.iter().map(|l| LogRow::Line {
            chunk,
            line: l.index,
        }));
    }
    rows
}

pub fn row_of_line(rows: &[LogRow], line: usize) -> Option<usize> {
    rows.iter().position(|r| r.line() == Some(line))
}

pub fn row_of_chunk(rows: &[LogRow], chunk: usize) -> Option<usize> {
    rows.iter()
        .position(|r| matches!(r, LogRow::Header { chunk: c } if *c == chunk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use runlog_logs::{ViewerConfig, ViewerSession, Viewport};
    use std::time::Duration;

    struct Headless;

    impl Viewport for Headless {
        fn reveal_line(&mut self, _line: usize) {}
        fn apply_temporary_highlight(&mut self, _line: usize, _duration: Duration) {}
        fn clear_highlight(&mut self) {}
    }

    fn session() -> ViewerSession {
        let config = ViewerConfig {
            chunk_size: 3,
            ..ViewerConfig::default()
        };
        let mut session = ViewerSession::new(&config).unwrap();
        session.install_log("a\nb\nc\nd\ne\nf\ng", &mut Headless);
        session
    }

    #[test]
    fn test_rows_for_default_expansion() {
        let session = session();
        let rows = log_rows(&session.render_model());

        // Three headers, only the last chunk (line 6) expanded
        assert_eq!(
            rows,
            vec![
                LogRow::Header { chunk: 0 },
                LogRow::Header { chunk: 1 },
                LogRow::Header { chunk: 2 },
                LogRow::Line { chunk: 2, line: 6 },
            ]
        );
    }

    #[test]
    fn test_row_lookup() {
        let mut session = session();
        session.toggle_chunk(0);
        let rows = log_rows(&session.render_model());

        assert_eq!(row_of_chunk(&rows, 1), Some(4));
        assert_eq!(row_of_line(&rows, 2), Some(3));
        assert_eq!(row_of_line(&rows, 4), None);
        assert_eq!(rows[3].chunk(), 0);
    }
}
