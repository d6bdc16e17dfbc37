//! Geospatial analysis view
//!
//! Plot-type tabs over a server-rendered map. Changing the plot type fetches
//! right away; the heatmap date only goes out on submit.

use crate::action::Action;
use crate::component::Component;
use crate::components::html_panel::HtmlPanel;
use crate::components::picker_dialog::PickerOption;
use crate::model::{
    FetchRequest, FetchResponse, FetchSlot, HtmlDocument, PickerPurpose, PlotType, SlotUpdate,
    HEATMAP_DATES,
};
use crate::services::{html, BrowserTarget};
use anyhow::Result;
use std::path::PathBuf;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub struct GeospatialView {
    pub(super) slot: FetchSlot<HtmlDocument>,
    plot_type: PlotType,
    heatmap_date: String,
    html: HtmlPanel,
    /// Where "open in browser" writes the document
    export_dir: PathBuf,
}

impl Default for GeospatialView {
    fn default() -> Self {
        Self::new()
    }
}

impl GeospatialView {
    pub fn new() -> Self {
        Self {
            slot: FetchSlot::new(),
            plot_type: PlotType::default(),
            heatmap_date: HEATMAP_DATES[0].to_string(),
            html: HtmlPanel::new(),
            export_dir: std::env::temp_dir(),
        }
    }

    pub fn plot_type(&self) -> PlotType {
        self.plot_type
    }

    pub fn heatmap_date(&self) -> &str {
        &self.heatmap_date
    }

    #[cfg(test)]
    pub fn document(&self) -> Option<&HtmlDocument> {
        self.slot.payload()
    }

    /// The form as it would be submitted now
    pub fn request(&self) -> FetchRequest {
        FetchRequest::GeospatialPlot {
            plot_type: self.plot_type,
            heatmap_date: self
                .plot_type
                .needs_date()
                .then(|| self.heatmap_date.clone()),
        }
    }

    pub fn date_options(&self) -> Vec<PickerOption> {
        HEATMAP_DATES
            .iter()
            .map(|d| PickerOption::new(*d, *d))
            .collect()
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

    fn set_plot_type(&mut self, plot_type: PlotType) -> Option<Action> {
        if plot_type == self.plot_type {
            return None;
        }
        self.plot_type = plot_type;
        Some(Action::Fetch(self.request()))
    }

    pub(super) fn browser_target(&self) -> Result<Option<BrowserTarget>> {
        match self.slot.payload().filter(|doc| !doc.is_empty()) {
            Some(doc) => {
                let path = html::write_temp_in(&self.export_dir, doc, self.plot_type.label())?;
                Ok(Some(BrowserTarget::File(path)))
            }
            None => Ok(None),
        }
    }
}

impl Component for GeospatialView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextSection),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevSection),
            KeyCode::Char('t') if self.plot_type.needs_date() => {
                Some(Action::OpenPicker(PickerPurpose::HeatmapDate))
            }
            KeyCode::Enter => Some(Action::SubmitPlot),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                return Ok(self.set_plot_type(PlotType::ALL[idx]));
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let follow_up = match action {
            Action::NextSection => self.set_plot_type(self.plot_type.next()),
            Action::PrevSection => self.set_plot_type(self.plot_type.previous()),
            Action::SetHeatmapDate(date) => {
                self.heatmap_date = date;
                None
            }
            Action::SubmitPlot => Some(Action::Fetch(self.request())),
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                self.html.update(&action);
                None
            }
            _ => None,
        };
        Ok(follow_up)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let form_height = if self.plot_type.needs_date() { 1 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(form_height),
                Constraint::Min(0),
            ])
            .split(area);

        let selected = PlotType::ALL
            .iter()
            .position(|p| *p == self.plot_type)
            .unwrap_or(0);
        let tabs = Tabs::new(
            PlotType::ALL
                .iter()
                .enumerate()
                .map(|(i, p)| format!("{} {}", i + 1, p.label())),
        )
        .block(Block::default().borders(Borders::BOTTOM))
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[0]);

        if self.plot_type.needs_date() {
            let form = Paragraph::new(Line::from(vec![
                Span::styled(" Heatmap date: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    self.heatmap_date.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled("   t ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::styled("change", Style::default().fg(Color::DarkGray)),
                Span::styled("  Enter ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled("submit", Style::default().fg(Color::DarkGray)),
            ]));
            frame.render_widget(form, chunks[1]);
        }

        let empty = if self.slot.is_loading() {
            "Rendering map on the server…"
        } else {
            "No map loaded. Press Enter to submit."
        };
        self.html.render(frame, chunks[2], empty);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_sends_heatmap_date() {
        let view = GeospatialView::new();
        assert_eq!(
            view.request(),
            FetchRequest::GeospatialPlot {
                plot_type: PlotType::GroundwaterHeatmap,
                heatmap_date: Some("Jan-23".to_string()),
            }
        );
    }

    #[test]
    fn test_plot_change_fetches_without_date() {
        let mut view = GeospatialView::new();
        let follow_up = view.update(Action::NextSection).unwrap();
        assert_eq!(
            follow_up,
            Some(Action::Fetch(FetchRequest::GeospatialPlot {
                plot_type: PlotType::WellsCluster,
                heatmap_date: None,
            }))
        );
    }

    #[test]
    fn test_date_change_waits_for_submit() {
        let mut view = GeospatialView::new();
        assert_eq!(view.update(Action::SetHeatmapDate("Aug-22".into())).unwrap(), None);
        assert_eq!(view.heatmap_date(), "Aug-22");

        let follow_up = view.update(Action::SubmitPlot).unwrap();
        assert_eq!(
            follow_up,
            Some(Action::Fetch(FetchRequest::GeospatialPlot {
                plot_type: PlotType::GroundwaterHeatmap,
                heatmap_date: Some("Aug-22".to_string()),
            }))
        );
    }

    #[test]
    fn test_number_keys_pick_plot_type() {
        let mut view = GeospatialView::new();
        let action = view.handle_key_event(KeyEvent::from(KeyCode::Char('4'))).unwrap();
        assert_eq!(view.plot_type(), PlotType::AquiferCircle);
        assert!(matches!(action, Some(Action::Fetch(_))));

        // Same plot again is not refetched
        let again = view.handle_key_event(KeyEvent::from(KeyCode::Char('4'))).unwrap();
        assert_eq!(again, None);
    }

    #[test]
    fn test_date_picker_only_for_heatmap() {
        let mut view = GeospatialView::new();
        let key = KeyEvent::from(KeyCode::Char('t'));
        assert_eq!(
            view.handle_key_event(key).unwrap(),
            Some(Action::OpenPicker(PickerPurpose::HeatmapDate))
        );
        view.update(Action::NextSection).unwrap();
        assert_eq!(view.handle_key_event(key).unwrap(), None);
    }

    #[test]
    fn test_applied_document_is_previewed() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = GeospatialView::new();
        view.export_dir = dir.path().to_path_buf();
        view.slot.begin(7);
        let doc = HtmlDocument::new("<h1>Wells</h1><script>map()</script>");
        assert_eq!(view.complete(7, Ok(FetchResponse::Html(doc.clone()))), SlotUpdate::Applied);
        assert_eq!(view.document(), Some(&doc));
        assert_eq!(view.html.line_count(), 1);
        match view.browser_target().unwrap() {
            Some(BrowserTarget::File(path)) => assert!(path.starts_with(dir.path())),
            other => panic!("expected file target, got {:?}", other),
        }
    }
}
