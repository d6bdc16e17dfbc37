//! Single-choice picker dialog
//!
//! Shared by the district filter and the heatmap date. The list shows the
//! options with their quick-pick number; the current value is marked.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::PickerPurpose;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// One choice: what is shown and what is submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub label: String,
    pub value: String,
}

impl PickerOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Default)]
pub struct PickerDialog {
    purpose: Option<PickerPurpose>,
    options: Vec<PickerOption>,
    current: Option<String>,
    selected_index: usize,
    list_state: ListState,
}

impl PickerDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load choices; the cursor starts on the current value
    pub fn open(
        &mut self,
        purpose: PickerPurpose,
        options: Vec<PickerOption>,
        current: Option<String>,
    ) {
        self.selected_index = current
            .as_deref()
            .and_then(|c| options.iter().position(|o| o.value == c))
            .unwrap_or(0);
        self.purpose = Some(purpose);
        self.options = options;
        self.current = current;
        self.list_state.select(Some(self.selected_index));
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.options
            .get(self.selected_index)
            .map(|o| o.value.as_str())
    }

    fn select(&mut self, index: usize) {
        if index < self.options.len() {
            self.selected_index = index;
            self.list_state.select(Some(index));
        }
    }

    fn title(&self) -> &'static str {
        match self.purpose {
            Some(PickerPurpose::District) => " Select District ",
            Some(PickerPurpose::HeatmapDate) => " Select Date for Heatmap ",
            None => " Select ",
        }
    }
}

impl Component for PickerDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter if !self.options.is_empty() => Some(Action::ConfirmModal),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select(self.selected_index.saturating_sub(1));
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select(self.selected_index + 1);
                Some(Action::ModalDown)
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.select(0);
                None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.select(self.options.len().saturating_sub(1));
                None
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.options.len() {
                    self.select(index);
                    Some(Action::ConfirmModal)
                } else {
                    None
                }
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = (self.options.len() as u16 + 5).clamp(7, 24);
        let popup_area = centered_popup(area, 50, height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let is_current = self.current.as_deref() == Some(option.value.as_str());
                let shortcut = if i < 9 {
                    format!("[{}] ", i + 1)
                } else {
                    "    ".to_string()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(shortcut, Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        if is_current { "● " } else { "  " },
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(option.label.clone()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title())
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Select  "),
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates() -> Vec<PickerOption> {
        ["Jan-23", "May-22", "Aug-22", "Nov-22"]
            .iter()
            .map(|d| PickerOption::new(*d, *d))
            .collect()
    }

    #[test]
    fn test_open_starts_on_current_value() {
        let mut picker = PickerDialog::new();
        picker.open(PickerPurpose::HeatmapDate, dates(), Some("Aug-22".to_string()));
        assert_eq!(picker.selected_value(), Some("Aug-22"));
        assert_eq!(picker.title(), " Select Date for Heatmap ");
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut picker = PickerDialog::new();
        picker.open(PickerPurpose::HeatmapDate, dates(), None);
        picker.handle_key_event(KeyEvent::from(KeyCode::Up)).unwrap();
        assert_eq!(picker.selected_value(), Some("Jan-23"));
        for _ in 0..10 {
            picker.handle_key_event(KeyEvent::from(KeyCode::Down)).unwrap();
        }
        assert_eq!(picker.selected_value(), Some("Nov-22"));
    }

    #[test]
    fn test_number_key_confirms() {
        let mut picker = PickerDialog::new();
        picker.open(PickerPurpose::HeatmapDate, dates(), None);
        let action = picker.handle_key_event(KeyEvent::from(KeyCode::Char('2'))).unwrap();
        assert_eq!(action, Some(Action::ConfirmModal));
        assert_eq!(picker.selected_value(), Some("May-22"));
        assert_eq!(picker.handle_key_event(KeyEvent::from(KeyCode::Char('9'))).unwrap(), None);
    }

    #[test]
    fn test_empty_picker_cannot_confirm() {
        let mut picker = PickerDialog::new();
        picker.open(PickerPurpose::District, Vec::new(), None);
        assert_eq!(picker.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap(), None);
        assert_eq!(picker.selected_value(), None);
    }
}
