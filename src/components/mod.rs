//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod figure_chart;
pub mod help_dialog;
pub mod html_panel;
pub mod layout;
pub mod picker_dialog;
pub mod quit_dialog;
pub mod sidebar;
pub mod views;

pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use picker_dialog::{PickerDialog, PickerOption};
pub use quit_dialog::QuitDialog;
pub use sidebar::SidebarComponent;
pub use views::ViewComponent;
