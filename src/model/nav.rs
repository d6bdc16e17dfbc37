//! Navigation panel state
//!
//! Fixed list of entries with two expandable groups. The cursor indexes the
//! currently visible rows, so it is re-clamped whenever a group collapses.

use super::view::{NavGroup, ViewId};

/// A top-level entry of the navigation panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEntry {
    View(ViewId),
    Group(NavGroup),
}

/// Entries in display order
pub const NAV_ENTRIES: [NavEntry; 6] = [
    NavEntry::View(ViewId::GeospatialAnalysis),
    NavEntry::View(ViewId::Hydrogeology),
    NavEntry::Group(NavGroup::Rainfall),
    NavEntry::View(ViewId::Population),
    NavEntry::View(ViewId::Elevation),
    NavEntry::Group(NavGroup::TidalCycles),
];

/// A visible row of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavRow {
    pub entry: NavEntry,
    /// 0 for top-level entries, 1 for views nested in an expanded group
    pub depth: u8,
}

/// What activating the row under the cursor does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavActivation {
    Select(ViewId),
    Toggle(NavGroup),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationPanel {
    rainfall_open: bool,
    tidal_open: bool,
    cursor: usize,
}

impl NavigationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, group: NavGroup) -> bool {
        match group {
            NavGroup::Rainfall => self.rainfall_open,
            NavGroup::TidalCycles => self.tidal_open,
        }
    }

    pub fn toggle_group(&mut self, group: NavGroup) {
        match group {
            NavGroup::Rainfall => self.rainfall_open = !self.rainfall_open,
            NavGroup::TidalCycles => self.tidal_open = !self.tidal_open,
        }
        self.clamp_cursor();
    }

    /// Rows currently visible, with children of expanded groups inlined
    pub fn rows(&self) -> Vec<NavRow> {
        let mut rows = Vec::with_capacity(NAV_ENTRIES.len() + 4);
        for entry in NAV_ENTRIES {
            rows.push(NavRow { entry, depth: 0 });
            if let NavEntry::Group(group) = entry {
                if self.is_expanded(group) {
                    rows.extend(group.children().into_iter().map(|view| NavRow {
                        entry: NavEntry::View(view),
                        depth: 1,
                    }));
                }
            }
        }
        rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn next(&mut self) {
        let len = self.rows().len();
        self.cursor = (self.cursor + 1) % len;
    }

    pub fn previous(&mut self) {
        let len = self.rows().len();
        self.cursor = if self.cursor == 0 { len - 1 } else { self.cursor - 1 };
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.rows().len() - 1;
    }

    /// Activation for the row under the cursor
    pub fn activation(&self) -> Option<NavActivation> {
        self.rows().get(self.cursor).map(|row| match row.entry {
            NavEntry::View(view) => NavActivation::Select(view),
            NavEntry::Group(group) => NavActivation::Toggle(group),
        })
    }

    /// Move the cursor onto `view`, expanding its group if needed
    pub fn reveal(&mut self, view: ViewId) {
        if let Some(group) = view.group() {
            if !self.is_expanded(group) {
                self.toggle_group(group);
            }
        }
        if let Some(idx) = self
            .rows()
            .iter()
            .position(|row| row.entry == NavEntry::View(view))
        {
            self.cursor = idx;
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        if self.cursor >= len {
            self.cursor = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_start_collapsed() {
        let nav = NavigationPanel::new();
        assert!(!nav.is_expanded(NavGroup::Rainfall));
        assert!(!nav.is_expanded(NavGroup::TidalCycles));
        assert_eq!(nav.rows().len(), NAV_ENTRIES.len());
    }

    #[test]
    fn test_groups_toggle_independently() {
        let mut nav = NavigationPanel::new();

        nav.toggle_group(NavGroup::Rainfall);
        assert!(nav.is_expanded(NavGroup::Rainfall));
        assert!(!nav.is_expanded(NavGroup::TidalCycles));

        nav.toggle_group(NavGroup::TidalCycles);
        assert!(nav.is_expanded(NavGroup::Rainfall));
        assert!(nav.is_expanded(NavGroup::TidalCycles));

        nav.toggle_group(NavGroup::Rainfall);
        assert!(!nav.is_expanded(NavGroup::Rainfall));
        assert!(nav.is_expanded(NavGroup::TidalCycles));
    }

    #[test]
    fn test_expanded_group_inlines_children_after_header() {
        let mut nav = NavigationPanel::new();
        nav.toggle_group(NavGroup::Rainfall);

        let rows = nav.rows();
        assert_eq!(rows.len(), NAV_ENTRIES.len() + 2);
        assert_eq!(rows[2].entry, NavEntry::Group(NavGroup::Rainfall));
        assert_eq!(rows[3].entry, NavEntry::View(ViewId::RainfallTrendAnalysis));
        assert_eq!(rows[3].depth, 1);
        assert_eq!(rows[4].entry, NavEntry::View(ViewId::RefreshRatePredictor));
        assert_eq!(rows[5].entry, NavEntry::View(ViewId::Population));
    }

    #[test]
    fn test_activation_on_group_toggles() {
        let mut nav = NavigationPanel::new();
        nav.next();
        nav.next();
        assert_eq!(nav.activation(), Some(NavActivation::Toggle(NavGroup::Rainfall)));

        nav.first();
        assert_eq!(
            nav.activation(),
            Some(NavActivation::Select(ViewId::GeospatialAnalysis))
        );
    }

    #[test]
    fn test_cursor_wraps() {
        let mut nav = NavigationPanel::new();
        nav.previous();
        assert_eq!(nav.cursor(), NAV_ENTRIES.len() - 1);
        nav.next();
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn test_collapsing_clamps_cursor() {
        let mut nav = NavigationPanel::new();
        nav.toggle_group(NavGroup::TidalCycles);
        nav.last();
        assert_eq!(
            nav.activation(),
            Some(NavActivation::Select(ViewId::TidalCycleImpactPrediction))
        );

        nav.toggle_group(NavGroup::TidalCycles);
        assert_eq!(nav.cursor(), NAV_ENTRIES.len() - 1);
        assert_eq!(
            nav.activation(),
            Some(NavActivation::Toggle(NavGroup::TidalCycles))
        );
    }

    #[test]
    fn test_reveal_expands_group_and_moves_cursor() {
        let mut nav = NavigationPanel::new();
        nav.reveal(ViewId::RefreshRatePredictor);

        assert!(nav.is_expanded(NavGroup::Rainfall));
        assert!(!nav.is_expanded(NavGroup::TidalCycles));
        assert_eq!(
            nav.activation(),
            Some(NavActivation::Select(ViewId::RefreshRatePredictor))
        );
    }
}
