//! Navigation sidebar
//!
//! Draws `NavigationPanel` rows as a list. Group headers carry an expand
//! arrow, nested views are indented, the active view is highlighted in green
//! and the cursor row gets the selection bar while the sidebar has focus.

use crate::action::Action;
use crate::component::Component;
use crate::model::{NavActivation, NavEntry, NavigationPanel, ViewId};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub struct SidebarComponent {
    pub nav: NavigationPanel,
    list_state: ListState,
    active: ViewId,
    focused: bool,
}

impl Default for SidebarComponent {
    fn default() -> Self {
        Self::new(ViewId::default())
    }
}

impl SidebarComponent {
    pub fn new(active: ViewId) -> Self {
        let mut nav = NavigationPanel::new();
        nav.reveal(active);
        Self {
            nav,
            list_state: ListState::default(),
            active,
            focused: true,
        }
    }

    /// Called by the app before drawing
    pub fn set_context(&mut self, active: ViewId, focused: bool) {
        self.active = active;
        self.focused = focused;
    }

    fn row_line(&self, entry: NavEntry, depth: u8, width: usize) -> Line<'static> {
        let indent = "  ".repeat(depth as usize);
        match entry {
            NavEntry::Group(group) => {
                let arrow = if self.nav.is_expanded(group) { "▾" } else { "▸" };
                let prefix = format!("{}{} {} ", indent, arrow, group.icon());
                let label = truncate_to_width(group.label(), width.saturating_sub(prefix.width()));
                Line::from(vec![
                    Span::styled(prefix, Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        label,
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                ])
            }
            NavEntry::View(view) => {
                let is_active = view == self.active;
                let marker = if is_active { "●" } else { " " };
                let prefix = format!("{}{} {} ", indent, marker, view.icon());
                let label = truncate_to_width(view.label(), width.saturating_sub(prefix.width()));
                let style = if is_active {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(prefix, Style::default().fg(Color::Yellow)),
                    Span::styled(label, style),
                ])
            }
        }
    }
}

impl Component for SidebarComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NavNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::NavPrev),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::NavFirst),
            KeyCode::Char('G') | KeyCode::End => Some(Action::NavLast),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') | KeyCode::Right => {
                Some(Action::NavActivate)
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NavNext => self.nav.next(),
            Action::NavPrev => self.nav.previous(),
            Action::NavFirst => self.nav.first(),
            Action::NavLast => self.nav.last(),
            Action::NavActivate => {
                return Ok(self.nav.activation().map(|activation| match activation {
                    NavActivation::Select(view) => Action::SelectView(view),
                    NavActivation::Toggle(group) => Action::ToggleGroup(group),
                }));
            }
            Action::ToggleGroup(group) => self.nav.toggle_group(group),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        // Borders plus the two-column highlight symbol
        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .nav
            .rows()
            .into_iter()
            .map(|row| ListItem::new(self.row_line(row.entry, row.depth, width)))
            .collect();

        let border = if self.focused { Color::Cyan } else { Color::DarkGray };
        let highlight = if self.focused {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Groundwater Analysis ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(border)),
            )
            .highlight_style(highlight)
            .highlight_symbol("▶ ");

        self.list_state.select(Some(self.nav.cursor()));
        frame.render_stateful_widget(list, area, &mut self.list_state);
        Ok(())
    }
}

/// Cut `s` to at most `max` terminal columns, ending in `…` when shortened
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NavGroup;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_activate_group_header_toggles() {
        let mut sidebar = SidebarComponent::new(ViewId::GeospatialAnalysis);
        // Geospatial, Hydrogeology, Rainfall
        sidebar.update(Action::NavNext).unwrap();
        sidebar.update(Action::NavNext).unwrap();
        let action = sidebar.update(Action::NavActivate).unwrap();
        assert_eq!(action, Some(Action::ToggleGroup(NavGroup::Rainfall)));

        sidebar.update(Action::ToggleGroup(NavGroup::Rainfall)).unwrap();
        assert!(sidebar.nav.is_expanded(NavGroup::Rainfall));
        assert!(!sidebar.nav.is_expanded(NavGroup::TidalCycles));
    }

    #[test]
    fn test_activate_view_selects_it() {
        let mut sidebar = SidebarComponent::new(ViewId::GeospatialAnalysis);
        sidebar.update(Action::NavNext).unwrap();
        let action = sidebar.update(Action::NavActivate).unwrap();
        assert_eq!(action, Some(Action::SelectView(ViewId::Hydrogeology)));
    }

    #[test]
    fn test_new_reveals_nested_active_view() {
        let sidebar = SidebarComponent::new(ViewId::TidalCycleImpactPrediction);
        assert!(sidebar.nav.is_expanded(NavGroup::TidalCycles));
        assert_eq!(
            sidebar.nav.activation(),
            Some(NavActivation::Select(ViewId::TidalCycleImpactPrediction))
        );
    }

    #[test]
    fn test_keys_map_to_nav_actions() {
        let mut sidebar = SidebarComponent::default();
        let key = |c| KeyEvent::from(KeyCode::Char(c));
        assert_eq!(sidebar.handle_key_event(key('j')).unwrap(), Some(Action::NavNext));
        assert_eq!(sidebar.handle_key_event(key('G')).unwrap(), Some(Action::NavLast));
        assert_eq!(
            sidebar.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap(),
            Some(Action::NavActivate)
        );
        assert_eq!(sidebar.handle_key_event(key('x')).unwrap(), None);
    }

    #[test]
    fn test_draw_shows_group_arrows() {
        let mut sidebar = SidebarComponent::new(ViewId::RefreshRatePredictor);
        let mut terminal = Terminal::new(TestBackend::new(34, 14)).unwrap();
        terminal
            .draw(|frame| {
                sidebar.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("▾"));
        assert!(text.contains("▸"));
        assert!(text.contains("Refresh Rate Predictor"));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Population", 20), "Population");
        assert_eq!(truncate_to_width("Tidal Cycle Impact Prediction", 10), "Tidal Cyc…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
