use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Margin, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use runlog_logs::{ChunkView, RenderModel};
use runlog_types::{ClassifiedLine, LineKind, PayloadFormat, SegmentStyle};

use crate::app::{AppState, Focus, LogRow, log_rows};
use crate::ui::components::{DiagnosticTreePane, HelpOverlay, StatusBar, viewer_hints};
use crate::ui::{Layout, Theme};

/// Log viewer screen: header, diagnostics tree, chunked log and status bar
pub struct LogViewerScreen;

impl LogViewerScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header, content, status) = Layout::main(frame.area());
        let (tree_area, log_area) = Layout::viewer(content);

        Self::render_header(frame, header, state);

        if let Some(tree_area) = tree_area {
            let focused = state.ui_state.focus == Focus::Diagnostics;
            DiagnosticTreePane::render(frame, tree_area, state, focused);
        }
        Self::render_log(frame, log_area, state);
        Self::render_status_bar(frame, status, state);

        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let sep = || Span::styled(" │ ", Theme::text_dim());
        let mut spans = vec![
            Span::styled("runlog", Theme::title()),
            sep(),
            Span::styled(state.source_name.clone(), Theme::text_highlight()),
        ];

        if let Some(record) = state.session.record() {
            let expansion = state.session.expansion();
            spans.extend([
                sep(),
                Span::styled(format!("{} lines", record.line_count), Theme::text()),
                sep(),
                Span::styled(
                    format!("E:{}", record.errors.len()),
                    Style::default().fg(LineKind::Error.color()),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("W:{}", record.warnings.len()),
                    Style::default().fg(LineKind::Warning.color()),
                ),
                sep(),
                Span::styled(
                    format!("{}/{} open", expansion.len(), expansion.max_open()),
                    Theme::text(),
                ),
                sep(),
                Span::styled(
                    record
                        .received_at
                        .with_timezone(&Local)
                        .format("%H:%M:%S")
                        .to_string(),
                    Theme::text_dim(),
                ),
            ]);
        }

        if let Some(response) = state.session.response() {
            let source = match response.format {
                PayloadFormat::ThreePart => format!(
                    "webout {} B · print {} B",
                    response.webout.len(),
                    response.print_output.len()
                ),
                PayloadFormat::Opaque => "raw log".to_string(),
            };
            spans.push(sep());
            spans.push(Span::styled(source, Theme::text_dim()));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_log(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let focused = state.ui_state.focus == Focus::Log;
        let inner_height = area.height.saturating_sub(2) as usize;
        state.ui_state.log_height = inner_height.max(1);

        let highlighted = state.viewport.highlighted_line();
        let model = state.session.render_model();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::pane_border(focused))
            .title(Span::styled(
                format!(" Log ({} chunks) ", model.chunks.len()),
                Theme::title(),
            ));

        if model.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No log output", Theme::text_dim())),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let rows = log_rows(&model);
        let ui = &mut state.ui_state;

        // Clamp cursor, then keep it on screen
        ui.log_cursor = ui.log_cursor.min(rows.len().saturating_sub(1));
        if ui.log_cursor < ui.log_scroll {
            ui.log_scroll = ui.log_cursor;
        } else if ui.log_cursor >= ui.log_scroll + ui.log_height {
            ui.log_scroll = ui.log_cursor + 1 - ui.log_height;
        }
        let max_scroll = rows.len().saturating_sub(inner_height);
        ui.log_scroll = ui.log_scroll.min(max_scroll);

        let number_width = model.line_count.to_string().len().max(3);
        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(ui.log_scroll)
            .take(inner_height)
            .map(|(i, row)| {
                let line = row_line(&model, *row, number_width, highlighted);
                if focused && i == ui.log_cursor {
                    line.patch_style(Theme::cursor())
                } else {
                    line
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);

        // Render scrollbar
        if rows.len() > inner_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));

            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max_scroll)
                .position(ui.log_scroll);

            frame.render_stateful_widget(
                scrollbar,
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let total = state.session.line_count();
        let right = state
            .rows()
            .get(state.ui_state.log_cursor)
            .map(|row| match row {
                LogRow::Line { line, .. } => format!("line {}/{}", line + 1, total),
                LogRow::Header { chunk } => {
                    format!("chunk {}/{}", chunk + 1, state.session.chunks().len())
                }
            })
            .unwrap_or_default();

        let hints = viewer_hints(state.ui_state.focus);
        let mut bar = StatusBar::new().hints(hints).right(right);
        if let Some(err) = &state.ui_state.error_message {
            bar = bar.message(err, Theme::error().bg(Color::DarkGray));
        } else if let Some(msg) = &state.ui_state.status_message {
            bar = bar.message(msg, Theme::status_bar());
        }

        frame.render_widget(bar, area);
    }
}

fn row_line<'a>(
    model: &RenderModel<'a>,
    row: LogRow,
    number_width: usize,
    highlighted: Option<usize>,
) -> Line<'a> {
    match row {
        LogRow::Header { chunk } => chunk_header(&model.chunks[chunk]),
        LogRow::Line { chunk, line } => {
            let view = &model.chunks[chunk];
            let lines: &'a [ClassifiedLine] = view.lines;
            let classified = &lines[line - view.chunk.start_line];
            let rendered = log_line(classified, number_width);
            if highlighted == Some(line) {
                rendered.patch_style(Theme::flash())
            } else {
                rendered
            }
        }
    }
}

fn chunk_header<'a>(view: &ChunkView<'a>) -> Line<'a> {
    let marker = if view.expanded { "▾" } else { "▸" };
    let mut spans = vec![Span::styled(
        format!("{} {}", marker, view.title()),
        Theme::chunk_header(view.expanded),
    )];
    if view.error_count > 0 {
        spans.push(Span::styled(
            format!("  E:{}", view.error_count),
            Style::default().fg(LineKind::Error.color()),
        ));
    }
    if view.warning_count > 0 {
        spans.push(Span::styled(
            format!("  W:{}", view.warning_count),
            Style::default().fg(LineKind::Warning.color()),
        ));
    }
    Line::from(spans)
}

fn log_line<'a>(line: &'a ClassifiedLine, number_width: usize) -> Line<'a> {
    // Lines classified by marker carry no markup; color them by kind
    let base = match line.kind() {
        LineKind::Error => Theme::segment(SegmentStyle::Error),
        LineKind::Warning => Theme::segment(SegmentStyle::Warning),
        LineKind::Plain => Theme::segment(SegmentStyle::Plain),
    };

    let mut spans = Vec::with_capacity(line.segments.len() + 2);
    spans.push(Span::styled(
        format!("{:>width$}", line.index + 1, width = number_width),
        Theme::line_number(),
    ));
    spans.push(Span::styled(" │ ", Theme::text_dim()));
    spans.extend(line.segments.iter().map(|segment| {
        let style = match segment.style {
            SegmentStyle::Plain => base,
            other => Theme::segment(other),
        };
        Span::styled(segment.text.as_str(), style)
    }));
    Line::from(spans)
}
