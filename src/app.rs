//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components. It owns
//! the router, the single mounted view and the fetch runner, and is the only
//! place where fetch outcomes meet view state.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, HelpDialog, PickerDialog, QuitDialog, SidebarComponent, ViewComponent,
};
use crate::config::Config;
use crate::model::{FetchRequest, Modal, ModalStack, PickerPurpose, SlotUpdate, ViewId, ViewRouter};
use crate::services::{ApiClient, BrowserTarget, FetchOutcome, FetchRunner};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Which pane receives unbound keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    /// Active view and sidebar visibility
    pub router: ViewRouter,

    /// The mounted view; replaced wholesale on every view switch
    pub view: ViewComponent,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background HTTP requests
    pub fetcher: FetchRunner,

    pub config: Config,

    pub focus: Focus,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// App-level failure (browser launch, temp files)
    pub error: Option<String>,

    pub status_message: Option<String>,

    /// Set by OpenInBrowser, handled by the main loop with the terminal suspended
    pub pending_browser: Option<BrowserTarget>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub sidebar: SidebarComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub picker: PickerDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(config: Config, initial: ViewId) -> Result<App> {
        let client = ApiClient::new(&config)?;
        let page_url = client.url_for(initial);
        let fetcher = FetchRunner::new(client)?;

        Ok(App {
            router: ViewRouter::new(initial),
            view: ViewComponent::mount(initial, page_url),
            modals: ModalStack::new(),
            fetcher,
            config,
            focus: Focus::Sidebar,
            should_quit: false,
            error: None,
            status_message: None,
            pending_browser: None,
            sidebar: SidebarComponent::new(initial),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            picker: PickerDialog::new(),
        })
    }

    /// Replace the mounted view and ask for its initial fetch
    fn mount(&mut self, view: ViewId) -> Action {
        let page_url = self.fetcher.client().url_for(view);
        self.view = ViewComponent::mount(view, page_url);
        Action::Fetch(self.view.initial_request())
    }

    /// Send `request` on behalf of the mounted view
    fn issue(&mut self, request: FetchRequest) {
        let seq = self.fetcher.spawn(self.view.id(), request.clone());
        self.view.begin_fetch(seq, request);
    }

    /// Route a finished request to the mounted view
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        let FetchOutcome {
            view,
            seq,
            request,
            elapsed,
            result,
        } = outcome;

        if view != self.view.id() {
            tracing::debug!(%view, seq, "dropping response for unmounted view");
            return;
        }

        match self.view.complete(seq, result) {
            SlotUpdate::Applied => {
                tracing::info!(%view, seq, %request, elapsed_ms = elapsed.as_millis() as u64, "fetch applied");
            }
            SlotUpdate::Failed => {
                tracing::warn!(
                    %view,
                    seq,
                    %request,
                    error = self.view.last_error().unwrap_or_default(),
                    "fetch failed"
                );
            }
            SlotUpdate::Stale => {
                tracing::debug!(%view, seq, latest = ?self.view.latest_seq(), "dropping superseded response");
            }
        }
    }

    fn open_in_browser(&mut self) {
        match self.view.browser_target() {
            Ok(Some(target)) => self.pending_browser = Some(target),
            Ok(None) => {
                self.status_message = Some("Nothing to open in this section".to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not prepare page for browser");
                self.error = Some(format!("Cannot open in browser: {}", e));
            }
        }
    }

    fn open_picker(&mut self, purpose: PickerPurpose) {
        if let Some((options, current)) = self.view.picker(purpose) {
            self.picker.open(purpose, options, current);
            self.modals.push(Modal::Picker(purpose));
        }
    }

    fn confirm_modal(&mut self) -> Option<Action> {
        match self.modals.top().cloned() {
            Some(Modal::Picker(purpose)) => {
                let value = self.picker.selected_value().map(str::to_string);
                self.modals.pop();
                value.map(|value| match purpose {
                    PickerPurpose::District => Action::SelectDistrict(value),
                    PickerPurpose::HeatmapDate => Action::SetHeatmapDate(value),
                })
            }
            Some(Modal::QuitConfirm) => Some(Action::ForceQuit),
            Some(Modal::Help) => {
                self.modals.pop();
                None
            }
            None => None,
        }
    }
}

impl Component for App {
    fn init(&mut self) -> Result<()> {
        tracing::info!(view = %self.view.id(), api = %self.fetcher.client().base_url(), "dashboard started");
        self.sidebar.init()?;
        let request = self.view.initial_request();
        self.issue(request);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('b') => Some(Action::ToggleSidebar),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::SwitchFocus),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('o') => Some(Action::OpenInBrowser),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            _ => {
                return match self.focus {
                    Focus::Sidebar if self.router.sidebar_open() => {
                        self.sidebar.handle_key_event(key)
                    }
                    _ => self.view.handle_key_event(key),
                };
            }
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action != Action::Tick {
            tracing::trace!(%action, "dispatch");
        }
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                for outcome in self.fetcher.poll() {
                    self.apply_outcome(outcome);
                }
                self.view.update(Action::Tick)?;
            }
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                self.should_quit = true;
            }

            // ─────────────────────────────────────────────────────────────────
            // Navigation Panel
            // ─────────────────────────────────────────────────────────────────
            Action::NavNext
            | Action::NavPrev
            | Action::NavFirst
            | Action::NavLast
            | Action::NavActivate
            | Action::ToggleGroup(_) => {
                return self.sidebar.update(action);
            }
            Action::SelectView(view) => {
                if self.router.select(view) {
                    tracing::info!(%view, "view selected");
                    self.status_message = None;
                    self.error = None;
                    return Ok(Some(self.mount(view)));
                }
            }
            Action::ToggleSidebar => {
                self.router.toggle_sidebar();
                if !self.router.sidebar_open() {
                    self.focus = Focus::Content;
                }
            }
            Action::SwitchFocus => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Content,
                    Focus::Content if self.router.sidebar_open() => Focus::Sidebar,
                    Focus::Content => Focus::Content,
                };
            }

            // ─────────────────────────────────────────────────────────────────
            // Content (delegate to the mounted view)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp
            | Action::ScrollDown
            | Action::PageUp
            | Action::PageDown
            | Action::NextSection
            | Action::PrevSection
            | Action::SelectDistrict(_)
            | Action::SetHeatmapDate(_)
            | Action::SubmitPlot => {
                return self.view.update(action);
            }
            Action::Refresh => {
                let request = self.view.refresh_request();
                tracing::info!(view = %self.view.id(), %request, "refresh");
                self.issue(request);
            }
            Action::Fetch(request) => self.issue(request),
            Action::OpenInBrowser => {
                self.error = None;
                self.open_in_browser();
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.in_flight = self.fetcher.in_flight();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.toggle(Modal::Help);
            }
            Action::OpenPicker(purpose) => self.open_picker(purpose),
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => return Ok(self.confirm_modal()),
            // The picker moves its own cursor while handling the key
            Action::ModalUp | Action::ModalDown => {}
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let sidebar_open = self.router.sidebar_open();
        let layout = calculate_main_layout(area, sidebar_open);

        if let Some(sidebar_area) = layout.sidebar {
            self.sidebar
                .set_context(self.router.active(), self.focus == Focus::Sidebar);
            self.sidebar.draw(frame, sidebar_area)?;
        }

        self.view
            .set_focused(self.focus == Focus::Content || !sidebar_open);
        self.view.draw(frame, layout.content)?;

        self.render_status_bar(frame, layout.status);
        self.render_help_bar(frame, layout.help);

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::Picker(_) => self.picker.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::Help => self.help_dialog.draw(frame, area),
            Modal::Picker(_) => self.picker.draw(frame, area),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let view = self.view.id();
        let mut spans = vec![
            Span::styled(
                format!(" {} ", view.label()),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", self.fetcher.client().base_url()),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        if self.view.is_loading() {
            spans.push(Span::styled(" ⟳ loading ", Style::default().fg(Color::Yellow)));
        } else if let Some(error) = self.view.last_error() {
            spans.push(Span::styled(
                format!(" ✗ {} ", error),
                Style::default().fg(Color::Red),
            ));
        } else if let Some(at) = self.view.updated_at() {
            spans.push(Span::styled(
                format!(" ✓ updated {} ", at.format("%H:%M:%S")),
                Style::default().fg(Color::Green),
            ));
        }

        if let Some(error) = &self.error {
            spans.push(Span::styled(
                format!(" Error: {} ", error),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(status) = &self.status_message {
            spans.push(Span::styled(
                format!(" {} ", status),
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_bar(&self, frame: &mut Frame, area: Rect) {
        let key_style = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled(" q ", key_style(Color::Yellow)),
            Span::raw("Quit "),
            Span::styled(" ? ", key_style(Color::White)),
            Span::raw("Help "),
            Span::styled(" Tab ", key_style(Color::Cyan)),
            Span::raw("Focus "),
            Span::styled(" b ", key_style(Color::Cyan)),
            Span::raw("Sidebar "),
            Span::styled(" r ", key_style(Color::Green)),
            Span::raw("Refresh "),
            Span::styled(" o ", key_style(Color::Green)),
            Span::raw("Browser "),
        ];

        if self.focus == Focus::Content || !self.router.sidebar_open() {
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            for (key, label) in self.view.key_hints() {
                spans.push(Span::styled(format!(" {} ", key), key_style(Color::Magenta)));
                spans.push(Span::raw(format!("{} ", label)));
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
