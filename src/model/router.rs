//! View router - which analysis view is active and whether the sidebar shows

use super::view::ViewId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRouter {
    active: ViewId,
    sidebar_open: bool,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new(ViewId::default())
    }
}

impl ViewRouter {
    pub fn new(initial: ViewId) -> Self {
        Self {
            active: initial,
            sidebar_open: true,
        }
    }

    pub fn active(&self) -> ViewId {
        self.active
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Switch to `view`. Returns true when the active view changed.
    pub fn select(&mut self, view: ViewId) -> bool {
        if self.active == view {
            return false;
        }
        self.active = view;
        true
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_changes_only_active_view() {
        let mut router = ViewRouter::default();
        let before_sidebar = router.sidebar_open();

        assert!(router.select(ViewId::Elevation));
        assert_eq!(router.active(), ViewId::Elevation);
        assert_eq!(router.sidebar_open(), before_sidebar);
    }

    #[test]
    fn test_reselecting_active_view_is_noop() {
        let mut router = ViewRouter::new(ViewId::Population);
        assert!(!router.select(ViewId::Population));
        assert_eq!(router.active(), ViewId::Population);
    }

    #[test]
    fn test_toggle_sidebar_keeps_active_view() {
        let mut router = ViewRouter::new(ViewId::TidalCycleAnalysis);
        assert!(router.sidebar_open());

        router.toggle_sidebar();
        assert!(!router.sidebar_open());
        assert_eq!(router.active(), ViewId::TidalCycleAnalysis);

        router.toggle_sidebar();
        assert!(router.sidebar_open());
        assert_eq!(router.active(), ViewId::TidalCycleAnalysis);
    }
}
