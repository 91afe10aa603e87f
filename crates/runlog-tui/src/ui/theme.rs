use ratatui::style::{Color, Modifier, Style};

use runlog_types::{DiagnosticKind, SegmentStyle};

/// Color theme for the application
pub struct Theme;

impl Theme {
    // Base colors
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    // Accent colors
    pub const PRIMARY: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::Yellow;

    pub const ERROR: Color = Color::Red;

    /// Background of a line recently navigated to
    pub const FLASH_BG: Color = Color::Rgb(90, 70, 0);

    // Border styles
    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Border style for a pane depending on focus
    pub fn pane_border(focused: bool) -> Style {
        if focused {
            Self::border_focused()
        } else {
            Self::border()
        }
    }

    // Text styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn text_highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    // List styles
    pub fn list_item() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BG)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    // Log content
    pub fn segment(style: SegmentStyle) -> Style {
        let base = Style::default().fg(style.color());
        match style {
            SegmentStyle::Error | SegmentStyle::Warning => base.add_modifier(Modifier::BOLD),
            SegmentStyle::Emphasis => base.add_modifier(Modifier::ITALIC),
            SegmentStyle::Plain | SegmentStyle::Note => base,
        }
    }

    pub fn diagnostic(kind: DiagnosticKind) -> Style {
        Style::default()
            .fg(kind.color())
            .add_modifier(Modifier::BOLD)
    }

    pub fn line_number() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    /// Temporary highlight for a navigated-to line
    pub fn flash() -> Style {
        Style::default().bg(Self::FLASH_BG)
    }

    /// Cursor row in the focused log pane
    pub fn cursor() -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    pub fn chunk_header(expanded: bool) -> Style {
        if expanded {
            Style::default()
                .fg(Self::PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::FG)
        }
    }

    // Status bar
    pub fn status_bar() -> Style {
        Style::default().fg(Self::FG).bg(Color::DarkGray)
    }

    pub fn status_bar_key() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    // Error
    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }
}
