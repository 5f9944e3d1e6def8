use std::sync::Arc;

use placesync_core::{MarkerKey, SearchableRecord};
use serde::Serialize;

/// Callback attached to each marker, invoked with the marker's key when the
/// user clicks it.
pub type MarkerClick = Arc<dyn Fn(&MarkerKey) + Send + Sync>;

/// Axis-aligned viewport in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest bounds containing every finite `(latitude, longitude)`
    /// point, or `None` when there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points
            .into_iter()
            .filter(|(lat, lng)| lat.is_finite() && lng.is_finite())
            .fold(None, |acc, (lat, lng)| {
                Some(match acc {
                    None => Self {
                        south: lat,
                        west: lng,
                        north: lat,
                        east: lng,
                    },
                    Some(b) => Self {
                        south: b.south.min(lat),
                        west: b.west.min(lng),
                        north: b.north.max(lat),
                        east: b.east.max(lng),
                    },
                })
            })
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// A stateful map that displays markers.
///
/// Handles are opaque to callers and are only ever handed back to the
/// surface that produced them.
pub trait MapSurface {
    type Handle;

    fn add_marker(
        &mut self,
        key: &MarkerKey,
        record: &SearchableRecord,
        label: &str,
        on_click: MarkerClick,
    ) -> Self::Handle;

    fn remove_marker(&mut self, key: &MarkerKey, handle: Self::Handle);

    fn clear_markers(&mut self);

    fn update_marker_label(&mut self, key: &MarkerKey, handle: &Self::Handle, label: &str);

    fn fit_bounds(&mut self, bounds: Bounds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_points() {
        let bounds = Bounds::from_points([(37.5, 127.0), (37.6, 126.9), (37.55, 127.1)]).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                south: 37.5,
                west: 126.9,
                north: 37.6,
                east: 127.1,
            }
        );
    }

    #[test]
    fn single_point_is_degenerate_bounds() {
        let bounds = Bounds::from_points([(33.45, 126.57)]).unwrap();
        assert_eq!(bounds.center(), (33.45, 126.57));
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let bounds =
            Bounds::from_points([(f64::NAN, 127.0), (37.5, f64::INFINITY), (37.5, 127.0)]).unwrap();
        assert_eq!(bounds.center(), (37.5, 127.0));
        assert!(Bounds::from_points([(f64::NAN, f64::NEG_INFINITY)]).is_none());
    }

    #[test]
    fn no_points_no_bounds() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }
}
