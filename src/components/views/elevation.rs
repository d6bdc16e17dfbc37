//! Elevation view
//!
//! JSON payload with a district list, per-district metrics, three HTML maps
//! and two Plotly figures. One section is shown at a time.

use crate::action::Action;
use crate::component::Component;
use crate::components::figure_chart::FigurePanel;
use crate::components::html_panel::HtmlPanel;
use crate::components::picker_dialog::PickerOption;
use crate::model::{
    ElevationPayload, FetchRequest, FetchResponse, FetchSlot, HtmlDocument, PickerPurpose,
    SlotUpdate, METRIC_CARDS,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElevationSection {
    #[default]
    Metrics,
    ElevationMap,
    AquiferMap,
    WellDepthMap,
    WellTypeFigure,
    WellDepthFigure,
}

impl ElevationSection {
    pub const ALL: [ElevationSection; 6] = [
        ElevationSection::Metrics,
        ElevationSection::ElevationMap,
        ElevationSection::AquiferMap,
        ElevationSection::WellDepthMap,
        ElevationSection::WellTypeFigure,
        ElevationSection::WellDepthFigure,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ElevationSection::Metrics => "Metrics",
            ElevationSection::ElevationMap => "Elevation HeatMap & Ground Water Level",
            ElevationSection::AquiferMap => "Aquifer Type vs Elevation",
            ElevationSection::WellDepthMap => "Well Depth vs Elevation Heatmap",
            ElevationSection::WellTypeFigure => "Well Type vs Elevation",
            ElevationSection::WellDepthFigure => "Well Depth vs Elevation",
        }
    }

    /// Short tab label
    fn tab(&self) -> &'static str {
        match self {
            ElevationSection::Metrics => "Metrics",
            ElevationSection::ElevationMap => "Elevation Map",
            ElevationSection::AquiferMap => "Aquifer",
            ElevationSection::WellDepthMap => "Well Depth Map",
            ElevationSection::WellTypeFigure => "Well Type Fig",
            ElevationSection::WellDepthFigure => "Well Depth Fig",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn map<'a>(&self, payload: &'a ElevationPayload) -> Option<&'a HtmlDocument> {
        match self {
            ElevationSection::ElevationMap => Some(&payload.elevation_map),
            ElevationSection::AquiferMap => Some(&payload.aquifer_map),
            ElevationSection::WellDepthMap => Some(&payload.well_depth_map),
            _ => None,
        }
    }

    fn figure<'a>(&self, payload: &'a ElevationPayload) -> Option<&'a str> {
        match self {
            ElevationSection::WellTypeFigure => payload.fig_well_type_vs_elevation.as_deref(),
            ElevationSection::WellDepthFigure => payload.fig_well_depth_vs_elevation.as_deref(),
            _ => None,
        }
    }
}

pub struct ElevationView {
    pub(super) slot: FetchSlot<ElevationPayload>,
    /// `None` until the user picks; `Some("")` means all districts
    selected_district: Option<String>,
    section: ElevationSection,
    html: HtmlPanel,
    figure: FigurePanel,
    /// Where "open in browser" writes maps and figure pages
    export_dir: PathBuf,
}

impl Default for ElevationView {
    fn default() -> Self {
        Self::new()
    }
}

impl ElevationView {
    pub fn new() -> Self {
        Self {
            slot: FetchSlot::new(),
            selected_district: None,
            section: ElevationSection::default(),
            html: HtmlPanel::new(),
            figure: FigurePanel::new(),
            export_dir: std::env::temp_dir(),
        }
    }

    pub fn payload(&self) -> Option<&ElevationPayload> {
        self.slot.payload()
    }

    pub fn section(&self) -> ElevationSection {
        self.section
    }

    pub fn selected_district(&self) -> Option<&str> {
        self.selected_district.as_deref()
    }

    pub fn district_options(&self) -> Vec<PickerOption> {
        let mut options = vec![PickerOption::new("All districts", "")];
        if let Some(payload) = self.payload() {
            options.extend(payload.districts.iter().map(|d| PickerOption::new(d, d)));
        }
        options
    }

    pub(super) fn complete(
        &mut self,
        seq: u64,
        result: Result<FetchResponse, String>,
    ) -> SlotUpdate {
        let result = result.and_then(ElevationPayload::try_from).map(|mut payload| {
            // District POSTs only answer with metrics, maps and figures
            if payload.districts.is_empty() {
                if let Some(previous) = self.slot.payload() {
                    payload.districts = previous.districts.clone();
                }
            }
            payload
        });
        let update = self.slot.complete(seq, result);
        if update == SlotUpdate::Applied {
            self.sync_panels();
        }
        update
    }

    /// Point the preview panels at the current section's content
    fn sync_panels(&mut self) {
        let Some(payload) = self.slot.payload() else {
            self.html.clear();
            self.figure.set_source(None);
            return;
        };
        match self.section.map(payload) {
            Some(doc) => self.html.set_document(doc),
            None => self.html.clear(),
        }
        self.figure.set_source(self.section.figure(payload));
    }

    fn set_section(&mut self, section: ElevationSection) {
        self.section = section;
        self.sync_panels();
    }

    pub(super) fn browser_target(&self) -> Result<Option<BrowserTarget>> {
        let Some(payload) = self.slot.payload() else {
            return Ok(None);
        };
        let stem = format!("elevation {}", self.section.title());
        if let Some(doc) = self.section.map(payload).filter(|d| !d.is_empty()) {
            let path = html::write_temp_in(&self.export_dir, doc, &stem)?;
            return Ok(Some(BrowserTarget::File(path)));
        }
        if let Some(json) = self.section.figure(payload) {
            let page = html::figure_page(self.section.title(), json);
            let path = html::write_temp_in(&self.export_dir, &page, &stem)?;
            return Ok(Some(BrowserTarget::File(path)));
        }
        Ok(None)
    }

    fn draw_metrics(&self, frame: &mut Frame, area: Rect) {
        let metrics = self.slot.payload().map(|p| &p.metrics);
        let district = match self.selected_district.as_deref() {
            None => {
                let hint = Paragraph::new(Line::from(vec![
                    Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                    Span::styled("d", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                    Span::styled(
                        " to select a district and show its metrics.",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                frame.render_widget(hint, area);
                return;
            }
            Some("") => "All districts",
            Some(d) => d,
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(4), Constraint::Length(4)])
            .split(area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("Metrics for {}", district),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            rows[0],
        );

        const CARD_COLORS: [Color; 5] =
            [Color::Blue, Color::Magenta, Color::Yellow, Color::Red, Color::Cyan];
        let cards: Vec<Rect> = [rows[1], rows[2]]
            .into_iter()
            .flat_map(|row| {
                Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Ratio(1, 3); 3])
                    .split(row)
                    .to_vec()
            })
            .collect();

        for (i, ((key, label), card)) in METRIC_CARDS.iter().zip(cards).enumerate() {
            let value = metrics.map(|m| m.display(key)).unwrap_or_else(|| "-".to_string());
            let color = CARD_COLORS[i % CARD_COLORS.len()];
            let paragraph = Paragraph::new(Span::styled(
                value,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", label))
                    .title_style(Style::default().fg(color))
                    .border_style(Style::default().fg(color)),
            );
            frame.render_widget(paragraph, card);
        }
    }
}

impl Component for ElevationView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('d') => Some(Action::OpenPicker(PickerPurpose::District)),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextSection),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevSection),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextSection => self.set_section(self.section.next()),
            Action::PrevSection => self.set_section(self.section.previous()),
            Action::SelectDistrict(district) => {
                self.selected_district = Some(district.clone());
                return Ok(Some(Action::Fetch(FetchRequest::ElevationDistrict(district))));
            }
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                self.html.update(&action);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);

        let district = match self.selected_district.as_deref() {
            None => "Select a district",
            Some("") => "All districts",
            Some(d) => d,
        };
        let district_count = self.payload().map_or(0, |p| p.districts.len());
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" District: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    district.to_string(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} available, d to change)", district_count),
                    Style::default().fg(Color::DarkGray),
                ),
            ])),
            chunks[0],
        );

        let tabs = Tabs::new(ElevationSection::ALL.iter().map(|s| s.tab()))
            .block(Block::default().borders(Borders::BOTTOM))
            .select(self.section.index())
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[1]);

        let body = chunks[2];
        if self.slot.payload().is_none() {
            let message = if self.slot.is_loading() {
                "Fetching elevation data…"
            } else {
                "No elevation data. Press r to retry."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray))),
                body,
            );
            return Ok(());
        }

        match self.section {
            ElevationSection::Metrics => self.draw_metrics(frame, body),
            ElevationSection::ElevationMap
            | ElevationSection::AquiferMap
            | ElevationSection::WellDepthMap => {
                self.html.render(frame, body, "The server sent no map for this section.");
            }
            ElevationSection::WellTypeFigure | ElevationSection::WellDepthFigure => {
                self.figure
                    .render(frame, body, "The server sent no figure for this section.");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview() -> ElevationPayload {
        serde_json::from_str(
            r#"{
                "districts": ["Kollam", "Idukki"],
                "elevation_map": "<p>elevation</p>",
                "aquifer_map": "<p>aquifer</p>",
                "well_depth_map": "",
                "fig_well_type_vs_elevation": "{\"data\": [{\"type\": \"bar\", \"x\": [\"Bore\"], \"y\": [3]}]}",
                "fig_well_depth_vs_elevation": null
            }"#,
        )
        .unwrap()
    }

    fn loaded_view() -> ElevationView {
        let mut view = ElevationView::new();
        view.slot.begin(1);
        view.complete(1, Ok(FetchResponse::Elevation(Box::new(overview()))));
        view
    }

    #[test]
    fn test_select_district_requests_filtered_data() {
        let mut view = loaded_view();
        let follow_up = view.update(Action::SelectDistrict("Idukki".to_string())).unwrap();
        assert_eq!(
            follow_up,
            Some(Action::Fetch(FetchRequest::ElevationDistrict("Idukki".to_string())))
        );
        assert_eq!(view.selected_district(), Some("Idukki"));
    }

    #[test]
    fn test_district_list_survives_post_response() {
        let mut view = loaded_view();
        let filtered: ElevationPayload = serde_json::from_str(
            r#"{"metrics": {"AQUIFER": "Laterite", "elevation": 812.5}, "elevation_map": "<p>x</p>"}"#,
        )
        .unwrap();

        view.slot.begin(2);
        let update = view.complete(2, Ok(FetchResponse::Elevation(Box::new(filtered))));
        assert_eq!(update, SlotUpdate::Applied);

        let payload = view.payload().unwrap();
        assert_eq!(payload.districts, vec!["Kollam", "Idukki"]);
        assert_eq!(payload.metrics.display("AQUIFER"), "Laterite");
        assert_eq!(payload.metrics.display("elevation"), "812.5");
        assert_eq!(payload.metrics.display("WELL TYPE"), "-");
    }

    #[test]
    fn test_district_options_start_with_all() {
        let view = loaded_view();
        let options = view.district_options();
        assert_eq!(options[0], PickerOption::new("All districts", ""));
        assert_eq!(options[1], PickerOption::new("Kollam", "Kollam"));
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn test_sections_cycle_and_load_content() {
        let mut view = loaded_view();
        view.update(Action::PrevSection).unwrap();
        assert_eq!(view.section(), ElevationSection::WellDepthFigure);
        view.update(Action::NextSection).unwrap();
        assert_eq!(view.section(), ElevationSection::Metrics);

        view.update(Action::NextSection).unwrap();
        assert_eq!(view.section(), ElevationSection::ElevationMap);
        assert_eq!(view.html.line_count(), 1);

        view.set_section(ElevationSection::WellTypeFigure);
        assert!(view.figure.figure().is_some());
    }

    #[test]
    fn test_browser_target_for_sections() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = loaded_view();
        view.export_dir = dir.path().to_path_buf();
        assert_eq!(view.browser_target().unwrap(), None);

        view.set_section(ElevationSection::AquiferMap);
        match view.browser_target().unwrap() {
            Some(BrowserTarget::File(path)) => {
                assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>aquifer</p>");
            }
            other => panic!("expected file target, got {:?}", other),
        }

        // Empty map has nothing to open
        view.set_section(ElevationSection::WellDepthMap);
        assert_eq!(view.browser_target().unwrap(), None);

        view.set_section(ElevationSection::WellTypeFigure);
        assert!(matches!(view.browser_target().unwrap(), Some(BrowserTarget::File(_))));
    }

    #[test]
    fn test_wrong_response_kind_is_a_failure() {
        let mut view = ElevationView::new();
        view.slot.begin(1);
        let update = view.complete(1, Ok(FetchResponse::Html(HtmlDocument::new("<p/>"))));
        assert_eq!(update, SlotUpdate::Failed);
        assert!(view.payload().is_none());
    }
}
