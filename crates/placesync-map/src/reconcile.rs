//! Marker reconciliation.
//!
//! Two independent passes keep the map in step with the UI:
//!
//! - **geometry** reacts to the displayed record set changing (new results,
//!   page or filter change) and only adds or removes markers;
//! - **decoration** reacts to the selection changing and only relabels
//!   markers whose selected state flipped.
//!
//! Neither pass rebuilds markers that are already correct.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use placesync_core::{MarkerKey, SearchableRecord};

use crate::surface::{Bounds, MapSurface, MarkerClick};

pub const SELECTED_LABEL_PREFIX: &str = "✓ ";

/// Label shown on a marker for `name` in the given selection state.
#[must_use]
pub fn marker_label(name: &str, selected: bool) -> String {
    if selected {
        format!("{SELECTED_LABEL_PREFIX}{name}")
    } else {
        name.to_string()
    }
}

/// Markers to create and markers to destroy to go from one displayed set to
/// the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryDiff {
    /// In the order the records were given.
    pub to_add: Vec<MarkerKey>,
    /// Sorted by key.
    pub to_remove: Vec<MarkerKey>,
}

impl GeometryDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compare the keys currently on the map with the records that should be.
///
/// Records without coordinates cannot be displayed, so they never appear in
/// `to_add` and an existing marker for one is scheduled for removal.
pub fn diff_geometry<'a, I>(previous: I, current: &[SearchableRecord]) -> GeometryDiff
where
    I: IntoIterator<Item = &'a MarkerKey>,
{
    let previous: HashSet<&MarkerKey> = previous.into_iter().collect();

    let mut wanted: HashSet<MarkerKey> = HashSet::with_capacity(current.len());
    let mut to_add = Vec::new();
    for record in current.iter().filter(|r| r.coordinates().is_some()) {
        let key = record.key();
        if wanted.insert(key.clone()) && !previous.contains(&key) {
            to_add.push(key);
        }
    }

    let mut to_remove: Vec<MarkerKey> = previous
        .into_iter()
        .filter(|key| !wanted.contains(*key))
        .cloned()
        .collect();
    to_remove.sort();

    GeometryDiff { to_add, to_remove }
}

/// Keys whose selected state differs between `previous` and `next`.
#[must_use]
pub fn selection_changes(
    previous: &HashSet<MarkerKey>,
    next: &HashSet<MarkerKey>,
) -> BTreeSet<MarkerKey> {
    previous.symmetric_difference(next).cloned().collect()
}

/// What one geometry pass did to the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryReport {
    pub added: usize,
    pub removed: usize,
    /// Whether the viewport was refitted (only happens when something was added).
    pub fitted: bool,
}

struct Marker<H> {
    handle: H,
    name: String,
    position: (f64, f64),
    selected: bool,
}

/// Owner of the live marker set for one map surface.
///
/// The marker set is only mutated by [`sync_geometry`](Self::sync_geometry),
/// [`update_selection`](Self::update_selection) and [`clear`](Self::clear).
pub struct MarkerReconciler<S: MapSurface> {
    markers: HashMap<MarkerKey, Marker<S::Handle>>,
    selection: HashSet<MarkerKey>,
    on_click: MarkerClick,
}

impl<S: MapSurface> Default for MarkerReconciler<S> {
    fn default() -> Self {
        Self::new(Arc::new(|_: &MarkerKey| {}))
    }
}

impl<S: MapSurface> MarkerReconciler<S> {
    /// `on_click` is attached to every marker this reconciler creates.
    #[must_use]
    pub fn new(on_click: MarkerClick) -> Self {
        Self {
            markers: HashMap::new(),
            selection: HashSet::new(),
            on_click,
        }
    }

    /// Bring the surface's markers in line with `records`.
    pub fn sync_geometry(&mut self, surface: &mut S, records: &[SearchableRecord]) -> GeometryReport {
        let diff = diff_geometry(self.markers.keys(), records);
        if diff.is_empty() {
            return GeometryReport::default();
        }

        let mut report = GeometryReport::default();
        for key in &diff.to_remove {
            if let Some(marker) = self.markers.remove(key) {
                surface.remove_marker(key, marker.handle);
                report.removed += 1;
            }
        }

        let mut pending: HashSet<&MarkerKey> = diff.to_add.iter().collect();
        for record in records {
            let key = record.key();
            if !pending.remove(&key) {
                continue;
            }
            let Some(position) = record.coordinates() else {
                continue;
            };
            let selected = self.selection.contains(&key);
            let label = marker_label(&record.name, selected);
            let handle = surface.add_marker(&key, record, &label, Arc::clone(&self.on_click));
            self.markers.insert(
                key,
                Marker {
                    handle,
                    name: record.name.clone(),
                    position,
                    selected,
                },
            );
            report.added += 1;
        }

        if report.added > 0 {
            if let Some(bounds) = Bounds::from_points(self.markers.values().map(|m| m.position)) {
                surface.fit_bounds(bounds);
                report.fitted = true;
            }
        }

        tracing::debug!(
            added = report.added,
            removed = report.removed,
            displayed = self.markers.len(),
            "marker geometry synced"
        );
        report
    }

    /// Replace the selection and relabel only the markers whose selected
    /// state changed. Returns the number of label updates issued.
    ///
    /// Selected keys with no marker are remembered so the marker gets the
    /// selected label if it is added later.
    pub fn update_selection<I>(&mut self, surface: &mut S, selection: I) -> usize
    where
        I: IntoIterator<Item = MarkerKey>,
    {
        let next: HashSet<MarkerKey> = selection.into_iter().collect();
        let mut updated = 0;
        for key in selection_changes(&self.selection, &next) {
            let Some(marker) = self.markers.get_mut(&key) else {
                continue;
            };
            marker.selected = next.contains(&key);
            surface.update_marker_label(
                &key,
                &marker.handle,
                &marker_label(&marker.name, marker.selected),
            );
            updated += 1;
        }
        self.selection = next;

        if updated > 0 {
            tracing::debug!(updated, "marker labels updated");
        }
        updated
    }

    /// Remove every marker from the surface and forget them. The selection
    /// is kept.
    pub fn clear(&mut self, surface: &mut S) {
        surface.clear_markers();
        self.markers.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &MarkerKey) -> bool {
        self.markers.contains_key(key)
    }

    /// Keys of the displayed markers, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<MarkerKey> {
        let mut keys: Vec<MarkerKey> = self.markers.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn is_selected(&self, key: &MarkerKey) -> bool {
        self.markers
            .get(key)
            .map_or_else(|| self.selection.contains(key), |m| m.selected)
    }

    #[must_use]
    pub fn selection(&self) -> &HashSet<MarkerKey> {
        &self.selection
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
