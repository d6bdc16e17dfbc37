//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Sidebar width when open, borders included
pub const SIDEBAR_WIDTH: u16 = 34;

/// Main screen layout areas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub sidebar: Option<Rect>,
    pub content: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Calculate main screen layout: sidebar | content, then status and help rows
pub fn calculate_main_layout(area: Rect, sidebar_open: bool) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let (sidebar, content) = if sidebar_open {
        // Narrow terminals keep at least half the width for content
        let width = SIDEBAR_WIDTH.min(rows[0].width / 2);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(width), Constraint::Min(0)])
            .split(rows[0]);
        (Some(columns[0]), columns[1])
    } else {
        (None, rows[0])
    };

    MainLayout {
        sidebar,
        content,
        status: rows[1],
        help: rows[2],
    }
}
