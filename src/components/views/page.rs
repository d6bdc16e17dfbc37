//! Embedded page view
//!
//! A server-rendered page fetched by URL. The terminal shows its readable
//! text; the page itself opens by URL in a browser.

use crate::action::Action;
use crate::component::Component;
use crate::components::html_panel::HtmlPanel;
use crate::model::{FetchResponse, FetchSlot, HtmlDocument, SlotUpdate, ViewId};
use crate::services::BrowserTarget;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct PageView {
    id: ViewId,
    url: String,
    pub(super) slot: FetchSlot<HtmlDocument>,
    html: HtmlPanel,
}

impl PageView {
    pub fn new(id: ViewId, url: String) -> Self {
        Self {
            id,
            url,
            slot: FetchSlot::new(),
            html: HtmlPanel::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[cfg(test)]
    pub fn document(&self) -> Option<&HtmlDocument> {
        self.slot.payload()
    }

    pub(super) fn complete(
        &mut self,
        seq: u64,
        result: Result<FetchResponse, String>,
    ) -> SlotUpdate {
        let update = self.slot.complete(seq, result.and_then(HtmlDocument::try_from));
        if update == SlotUpdate::Applied {
            if let Some(doc) = self.slot.payload() {
                self.html.set_document(doc);
            }
        }
        update
    }

    pub(super) fn browser_target(&self) -> BrowserTarget {
        BrowserTarget::Url(self.url().to_string())
    }
}

impl Component for PageView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        self.html.update(&action);
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Source: ", Style::default().fg(Color::DarkGray)),
                Span::styled(self.url().to_string(), Style::default().fg(Color::Blue)),
            ])),
            chunks[0],
        );

        let empty = if self.slot.is_loading() {
            format!("Loading {}…", self.id.label())
        } else {
            format!("{} has not loaded. Press r to retry.", self.id.label())
        };
        self.html.render(frame, chunks[1], &empty);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_opens_page_url() {
        let view = PageView::new(ViewId::Population, "http://h/api/population/".to_string());
        assert_eq!(view.url(), "http://h/api/population/");
        assert_eq!(
            view.browser_target(),
            BrowserTarget::Url("http://h/api/population/".to_string())
        );
    }

    #[test]
    fn test_stale_outcome_is_dropped() {
        let mut view = PageView::new(ViewId::TidalCycleAnalysis, String::new());
        view.slot.begin(1);
        view.slot.begin(2);

        let late = FetchResponse::Html(HtmlDocument::new("<p>old</p>"));
        assert_eq!(view.complete(1, Ok(late)), SlotUpdate::Stale);
        assert!(view.document().is_none());
        assert!(view.slot.is_loading());

        let fresh = FetchResponse::Html(HtmlDocument::new("<p>new</p>"));
        assert_eq!(view.complete(2, Ok(fresh)), SlotUpdate::Applied);
        assert_eq!(view.document().map(|d| d.body.as_str()), Some("<p>new</p>"));
    }
}
