//! Scrollable text preview of an HTML document
//!
//! Used for every server-rendered map and page. The readable text is
//! extracted once per document; documents that are almost all script
//! (folium maps, Plotly pages) get a short summary instead.

use crate::action::Action;
use crate::model::HtmlDocument;
use crate::services::html;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

const PAGE_SIZE: usize = 20;

#[derive(Debug, Default)]
pub struct HtmlPanel {
    title: Option<String>,
    lines: Vec<String>,
    size: usize,
    scripts: usize,
    scroll: usize,
}

impl HtmlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the previewed document and reset scrolling
    pub fn set_document(&mut self, doc: &HtmlDocument) {
        self.title = html::title(doc);
        self.lines = html::text_lines(doc);
        self.size = doc.len();
        self.scripts = html::script_count(doc);
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    #[cfg(test)]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Apply a scroll action; anything else is ignored
    pub fn update(&mut self, action: &Action) {
        let max_scroll = self.lines.len().saturating_sub(1);
        match action {
            Action::ScrollDown => self.scroll = (self.scroll + 1).min(max_scroll),
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::PageDown => self.scroll = (self.scroll + PAGE_SIZE).min(max_scroll),
            Action::PageUp => self.scroll = self.scroll.saturating_sub(PAGE_SIZE),
            _ => {}
        }
    }

    fn header(&self) -> Vec<Line<'static>> {
        let mut header = Vec::new();
        if let Some(title) = &self.title {
            header.push(Line::from(Span::styled(
                title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )));
        }
        header.push(Line::from(vec![
            Span::styled(
                format!("{} of HTML", html::format_size(self.size)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("  {} script(s)", self.scripts),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled("  o ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled("open in browser", Style::default().fg(Color::DarkGray)),
        ]));
        header.push(Line::from(""));
        header
    }

    /// Draw the preview; `empty` is shown when no document has loaded yet
    pub fn render(&mut self, frame: &mut Frame, area: Rect, empty: &str) {
        if self.size == 0 {
            let message = Paragraph::new(Line::from(Span::styled(
                empty.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(message, area);
            return;
        }

        let mut content = self.header();
        if self.lines.is_empty() {
            content.push(Line::from(Span::styled(
                "Interactive content only; no readable text in this document.",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            content.extend(
                self.lines
                    .iter()
                    .skip(self.scroll)
                    .map(|line| Line::from(line.clone())),
            );
        }

        let paragraph = Paragraph::new(content).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);

        let visible = area.height as usize;
        if self.lines.len() > visible {
            let mut state = ScrollbarState::new(self.lines.len().saturating_sub(1))
                .position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area,
                &mut state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn doc_with_lines(n: usize) -> HtmlDocument {
        let body: String = (0..n).map(|i| format!("<p>line {}</p>", i)).collect();
        HtmlDocument::new(body)
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut panel = HtmlPanel::new();
        panel.set_document(&doc_with_lines(3));
        assert_eq!(panel.line_count(), 3);

        panel.update(&Action::PageDown);
        assert_eq!(panel.scroll(), 2);
        panel.update(&Action::ScrollDown);
        assert_eq!(panel.scroll(), 2);
        panel.update(&Action::PageUp);
        assert_eq!(panel.scroll(), 0);
    }

    #[test]
    fn test_new_document_resets_scroll() {
        let mut panel = HtmlPanel::new();
        panel.set_document(&doc_with_lines(10));
        panel.update(&Action::ScrollDown);
        panel.set_document(&doc_with_lines(10));
        assert_eq!(panel.scroll(), 0);
    }

    #[test]
    fn test_render_script_only_document() {
        let mut panel = HtmlPanel::new();
        panel.set_document(&HtmlDocument::new("<script>L.map('m')</script>"));
        let mut terminal = Terminal::new(TestBackend::new(80, 6)).unwrap();
        terminal
            .draw(|frame| panel.render(frame, frame.area(), "nothing"))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Interactive content only"));
        assert!(text.contains("1 script(s)"));
    }
}
