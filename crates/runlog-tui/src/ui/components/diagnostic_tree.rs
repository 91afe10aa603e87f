use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use runlog_logs::TreeRow;

use crate::app::AppState;
use crate::ui::Theme;

/// Left pane: errors and warnings grouped under headings
pub struct DiagnosticTreePane;

impl DiagnosticTreePane {
    pub fn render(frame: &mut Frame, area: Rect, state: &mut AppState, focused: bool) {
        let tree = state.session.diagnostic_tree();
        let total = tree.len();

        // Clamp selection to valid range
        if total == 0 {
            state.ui_state.tree_selection = 0;
        } else if state.ui_state.tree_selection >= total {
            state.ui_state.tree_selection = total - 1;
        }
        let selection = state.ui_state.tree_selection;

        // Keep the selection in view
        let viewport_height = area.height.saturating_sub(2) as usize;
        let selected_row = if total == 0 { 0 } else { tree.row_of(selection) };
        if viewport_height > 0 {
            if selected_row >= state.ui_state.tree_scroll + viewport_height {
                state.ui_state.tree_scroll = selected_row + 1 - viewport_height;
            }
            if selected_row < state.ui_state.tree_scroll {
                state.ui_state.tree_scroll = selected_row;
            }
        }
        let row_count = tree.row_count();
        let max_scroll = row_count.saturating_sub(viewport_height);
        state.ui_state.tree_scroll = state.ui_state.tree_scroll.min(max_scroll);

        // Only the visible rows are built
        let inner_width = area.width.saturating_sub(2) as usize;
        let first = state.ui_state.tree_scroll;
        let last = (first + viewport_height).min(row_count);
        let visible: Vec<Line> = (first..last)
            .filter_map(|row| tree.row(row))
            .map(|row| match row {
                TreeRow::Heading(group) => Line::from(Span::styled(
                    group.heading(),
                    Theme::diagnostic(group.kind),
                )),
                TreeRow::Entry {
                    position,
                    diagnostic,
                } => {
                    let number = format!(" {:>6} ", diagnostic.line + 1);
                    let body_width = inner_width.saturating_sub(number.width());
                    let body = truncate_to_width(&diagnostic.body, body_width);

                    if focused && position == selection {
                        Line::from(vec![
                            Span::styled(number, Theme::list_item_selected()),
                            Span::styled(body, Theme::list_item_selected()),
                        ])
                        .style(Theme::list_item_selected())
                    } else {
                        Line::from(vec![
                            Span::styled(number, Theme::line_number()),
                            Span::styled(body, Theme::list_item()),
                        ])
                    }
                }
            })
            .collect();

        let title = format!(" Diagnostics ({}) ", total);
        let widget = Paragraph::new(visible).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::pane_border(focused))
                .title(Span::styled(title, Theme::title())),
        );

        frame.render_widget(widget, area);
    }
}

/// Truncate to a display width, appending an ellipsis when cut
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}
