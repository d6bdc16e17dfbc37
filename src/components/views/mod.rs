//! Mounted analysis views
//!
//! Exactly one view is mounted at a time. `ViewComponent` holds what every
//! view shares (last request, spinner, focus) and delegates the rest to the
//! view body matching the view's display strategy.

mod elevation;
mod geospatial;
mod page;

use elevation::ElevationView;
use geospatial::GeospatialView;
use page::PageView;

use crate::action::Action;
use crate::component::Component;
use crate::components::picker_dialog::PickerOption;
use crate::model::{DisplayStrategy, FetchRequest, FetchResponse, PickerPurpose, SlotUpdate, ViewId};
use crate::services::BrowserTarget;
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

enum ViewBody {
    Elevation(ElevationView),
    Geospatial(GeospatialView),
    Page(PageView),
}

pub struct ViewComponent {
    id: ViewId,
    body: ViewBody,
    last_request: Option<FetchRequest>,
    spinner: usize,
    focused: bool,
}

impl ViewComponent {
    /// Fresh state for `view`. `page_url` is where an embedded page lives.
    pub fn mount(id: ViewId, page_url: String) -> Self {
        let body = match id.strategy() {
            DisplayStrategy::InjectAndChart => ViewBody::Elevation(ElevationView::new()),
            DisplayStrategy::InlineDocument => ViewBody::Geospatial(GeospatialView::new()),
            DisplayStrategy::EmbeddedPage => ViewBody::Page(PageView::new(id, page_url)),
        };
        Self {
            id,
            body,
            last_request: None,
            spinner: 0,
            focused: false,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Request issued when the view mounts
    pub fn initial_request(&self) -> FetchRequest {
        match &self.body {
            ViewBody::Elevation(_) => FetchRequest::ElevationOverview,
            ViewBody::Geospatial(v) => v.request(),
            ViewBody::Page(_) => FetchRequest::Page(self.id),
        }
    }

    /// Request a refresh re-issues
    pub fn refresh_request(&self) -> FetchRequest {
        self.last_request
            .clone()
            .unwrap_or_else(|| self.initial_request())
    }

    #[cfg(test)]
    pub fn last_request(&self) -> Option<&FetchRequest> {
        self.last_request.as_ref()
    }

    /// Record that `request` went out as sequence `seq`
    pub fn begin_fetch(&mut self, seq: u64, request: FetchRequest) {
        self.last_request = Some(request);
        match &mut self.body {
            ViewBody::Elevation(v) => v.slot.begin(seq),
            ViewBody::Geospatial(v) => v.slot.begin(seq),
            ViewBody::Page(v) => v.slot.begin(seq),
        }
    }

    pub fn complete(&mut self, seq: u64, result: Result<FetchResponse, String>) -> SlotUpdate {
        match &mut self.body {
            ViewBody::Elevation(v) => v.complete(seq, result),
            ViewBody::Geospatial(v) => v.complete(seq, result),
            ViewBody::Page(v) => v.complete(seq, result),
        }
    }

    pub fn latest_seq(&self) -> Option<u64> {
        match &self.body {
            ViewBody::Elevation(v) => v.slot.latest_seq(),
            ViewBody::Geospatial(v) => v.slot.latest_seq(),
            ViewBody::Page(v) => v.slot.latest_seq(),
        }
    }

    pub fn is_loading(&self) -> bool {
        match &self.body {
            ViewBody::Elevation(v) => v.slot.is_loading(),
            ViewBody::Geospatial(v) => v.slot.is_loading(),
            ViewBody::Page(v) => v.slot.is_loading(),
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.body {
            ViewBody::Elevation(v) => v.slot.last_error(),
            ViewBody::Geospatial(v) => v.slot.last_error(),
            ViewBody::Page(v) => v.slot.last_error(),
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        match &self.body {
            ViewBody::Elevation(v) => v.slot.updated_at(),
            ViewBody::Geospatial(v) => v.slot.updated_at(),
            ViewBody::Page(v) => v.slot.updated_at(),
        }
    }

    pub fn as_elevation(&self) -> Option<&ElevationView> {
        match &self.body {
            ViewBody::Elevation(v) => Some(v),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn as_geospatial(&self) -> Option<&GeospatialView> {
        match &self.body {
            ViewBody::Geospatial(v) => Some(v),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn as_page(&self) -> Option<&PageView> {
        match &self.body {
            ViewBody::Page(v) => Some(v),
            _ => None,
        }
    }

    /// Choices and current value for a picker opened on this view
    pub fn picker(&self, purpose: PickerPurpose) -> Option<(Vec<PickerOption>, Option<String>)> {
        match (&self.body, purpose) {
            (ViewBody::Elevation(v), PickerPurpose::District) => {
                Some((v.district_options(), v.selected_district().map(str::to_string)))
            }
            (ViewBody::Geospatial(v), PickerPurpose::HeatmapDate) if v.plot_type().needs_date() => {
                Some((v.date_options(), Some(v.heatmap_date().to_string())))
            }
            _ => None,
        }
    }

    /// What "open in browser" should show for the current state
    pub fn browser_target(&self) -> Result<Option<BrowserTarget>> {
        match &self.body {
            ViewBody::Elevation(v) => v.browser_target(),
            ViewBody::Geospatial(v) => v.browser_target(),
            ViewBody::Page(v) => Ok(Some(v.browser_target())),
        }
    }

    /// Short hint for the help bar
    pub fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        match &self.body {
            ViewBody::Elevation(_) => &[("d", "District"), ("h/l", "Section"), ("j/k", "Scroll")],
            ViewBody::Geospatial(v) if v.plot_type().needs_date() => &[
                ("h/l", "Plot"),
                ("t", "Date"),
                ("Enter", "Submit"),
                ("j/k", "Scroll"),
            ],
            ViewBody::Geospatial(_) => &[("h/l", "Plot"), ("j/k", "Scroll")],
            ViewBody::Page(_) => &[("j/k", "Scroll")],
        }
    }

    fn title(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                format!(" {} {} ", self.id.icon(), self.id.label()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(elevation) = self.as_elevation() {
            spans.push(Span::styled(
                format!("· {} ", elevation.section().title()),
                Style::default().fg(Color::White),
            ));
        }
        if self.is_loading() {
            spans.push(Span::styled(
                format!("{} Loading… ", SPINNER[self.spinner % SPINNER.len()]),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }
}

impl Component for ViewComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match &mut self.body {
            ViewBody::Elevation(v) => v.handle_key_event(key),
            ViewBody::Geospatial(v) => v.handle_key_event(key),
            ViewBody::Page(v) => v.handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick {
            if self.is_loading() {
                self.spinner = self.spinner.wrapping_add(1);
            }
            return Ok(None);
        }
        match &mut self.body {
            ViewBody::Elevation(v) => v.update(action),
            ViewBody::Geospatial(v) => v.update(action),
            ViewBody::Page(v) => v.update(action),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let border = if self.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &mut self.body {
            ViewBody::Elevation(v) => v.draw(frame, inner),
            ViewBody::Geospatial(v) => v.draw(frame, inner),
            ViewBody::Page(v) => v.draw(frame, inner),
        }
    }
}
