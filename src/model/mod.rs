//! Model layer - state that outlives a single frame
//!
//! - `ViewId` / `NavGroup` - the closed set of analysis views
//! - `ViewRouter` - active view and sidebar visibility
//! - `NavigationPanel` - sidebar rows, groups and cursor
//! - `FetchSlot` - per-view loading flag, payload and sequence guard
//! - payload and figure types decoded from the API
//! - `ModalStack` - modal overlay management

pub mod fetch;
pub mod figure;
pub mod modal;
pub mod nav;
pub mod payload;
pub mod router;
pub mod view;

pub use fetch::{FetchSlot, SlotUpdate};
pub use figure::Figure;
pub use modal::{Modal, ModalStack, PickerPurpose};
pub use nav::{NavActivation, NavEntry, NavigationPanel};
pub use payload::{
    ElevationPayload, FetchRequest, FetchResponse, HtmlDocument, PlotType, HEATMAP_DATES,
    METRIC_CARDS,
};
pub use router::ViewRouter;
pub use view::{DisplayStrategy, NavGroup, ViewId};
