//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::{FetchRequest, NavGroup, PickerPurpose, ViewId};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick: drains finished fetches, advances the spinner
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation Panel
    // ─────────────────────────────────────────────────────────────────────────
    /// Move the sidebar cursor down
    NavNext,
    /// Move the sidebar cursor up
    NavPrev,
    /// Jump to the first sidebar row
    NavFirst,
    /// Jump to the last sidebar row
    NavLast,
    /// Activate the row under the sidebar cursor
    NavActivate,
    /// Make a view the active one
    SelectView(ViewId),
    /// Expand or collapse a navigation group
    ToggleGroup(NavGroup),
    /// Show or hide the sidebar
    ToggleSidebar,
    /// Move keyboard focus between sidebar and content
    SwitchFocus,

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    /// Next section / plot type of the active view
    NextSection,
    /// Previous section / plot type of the active view
    PrevSection,
    /// Re-issue the active view's last request
    Refresh,
    /// Open the current document in the browser
    OpenInBrowser,
    /// Issue a request on behalf of the active view
    Fetch(FetchRequest),

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    /// Open a picker for the active view
    OpenPicker(PickerPurpose),
    CloseModal,
    ConfirmModal,
    ModalUp,
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // View Inputs
    // ─────────────────────────────────────────────────────────────────────────
    /// Filter elevation by district; empty means all districts
    SelectDistrict(String),
    /// Change the heatmap date (does not fetch)
    SetHeatmapDate(String),
    /// Submit the geospatial form with the current inputs
    SubmitPlot,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NavNext => write!(f, "NavNext"),
            Action::NavPrev => write!(f, "NavPrev"),
            Action::NavFirst => write!(f, "NavFirst"),
            Action::NavLast => write!(f, "NavLast"),
            Action::NavActivate => write!(f, "NavActivate"),
            Action::SelectView(view) => write!(f, "SelectView({})", view),
            Action::ToggleGroup(group) => write!(f, "ToggleGroup({})", group.label()),
            Action::ToggleSidebar => write!(f, "ToggleSidebar"),
            Action::SwitchFocus => write!(f, "SwitchFocus"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::NextSection => write!(f, "NextSection"),
            Action::PrevSection => write!(f, "PrevSection"),
            Action::Refresh => write!(f, "Refresh"),
            Action::OpenInBrowser => write!(f, "OpenInBrowser"),
            Action::Fetch(request) => write!(f, "Fetch({})", request),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenPicker(purpose) => write!(f, "OpenPicker({:?})", purpose),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::SelectDistrict(d) => write!(f, "SelectDistrict({})", d),
            Action::SetHeatmapDate(d) => write!(f, "SetHeatmapDate({})", d),
            Action::SubmitPlot => write!(f, "SubmitPlot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlotType;

    #[test]
    fn test_display_for_logs() {
        assert_eq!(Action::SelectView(ViewId::Elevation).to_string(), "SelectView(Elevation)");
        assert_eq!(
            Action::ToggleGroup(NavGroup::TidalCycles).to_string(),
            "ToggleGroup(Tidal Cycles)"
        );
        assert_eq!(
            Action::OpenPicker(PickerPurpose::District).to_string(),
            "OpenPicker(District)"
        );
        assert_eq!(
            Action::Fetch(FetchRequest::ElevationDistrict("Idukki".to_string())).to_string(),
            "Fetch(ElevationDistrict(Idukki))"
        );
        let plot = FetchRequest::GeospatialPlot {
            plot_type: PlotType::GroundwaterHeatmap,
            heatmap_date: Some("May-22".to_string()),
        };
        assert_eq!(
            Action::Fetch(plot).to_string(),
            format!("Fetch(GeospatialPlot({}, May-22))", PlotType::GroundwaterHeatmap)
        );
    }
}
