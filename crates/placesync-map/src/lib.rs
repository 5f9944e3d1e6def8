//! Map-marker synchronisation for place search results.
//!
//! [`MarkerReconciler`] keeps a stateful [`MapSurface`] in step with the
//! displayed results using the fewest add, remove and relabel calls.
//! [`ResultView`] decides which results are displayed (one page, optionally
//! filtered by category).

pub mod reconcile;
pub mod surface;
pub mod view;

pub use reconcile::{
    diff_geometry, marker_label, selection_changes, GeometryDiff, GeometryReport,
    MarkerReconciler, SELECTED_LABEL_PREFIX,
};
pub use surface::{Bounds, MapSurface, MarkerClick};
pub use view::{ResultPage, ResultView};
