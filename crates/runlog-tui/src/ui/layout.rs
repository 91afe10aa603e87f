use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Create the main layout with header, content, and status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Split content into the diagnostics tree (left) and the log (right).
    /// The tree is dropped on very narrow terminals.
    pub fn viewer(area: Rect) -> (Option<Rect>, Rect) {
        if area.width < 60 {
            return (None, area);
        }
        let chunks = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(32), // Diagnostics
                Constraint::Percentage(68), // Log
            ])
            .split(area);
        (Some(chunks[0]), chunks[1])
    }

    /// Centered popup of at most `width` x `height`
    pub fn popup(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_split() {
        let (tree, log) = Layout::viewer(Rect::new(0, 0, 100, 30));
        let tree = tree.unwrap();
        assert_eq!(tree.width + log.width, 100);
        assert!(tree.width < log.width);
    }

    #[test]
    fn test_narrow_viewer_drops_tree() {
        let (tree, log) = Layout::viewer(Rect::new(0, 0, 40, 30));
        assert!(tree.is_none());
        assert_eq!(log.width, 40);
    }

    #[test]
    fn test_popup_centered() {
        let popup = Layout::popup(Rect::new(0, 0, 100, 40), 50, 20);
        assert_eq!(popup, Rect::new(25, 10, 50, 20));
    }
}
