use std::sync::Mutex;

use placesync_core::{Category, SourceTag};

use super::*;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Add(String, String),
    Remove(String, u32),
    Clear,
    Label(String, u32, String),
    Fit(Bounds),
}

/// Records every surface call; handles are sequential integers.
#[derive(Default)]
struct RecordingSurface {
    calls: Vec<Call>,
    next_handle: u32,
}

impl RecordingSurface {
    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl MapSurface for RecordingSurface {
    type Handle = u32;

    fn add_marker(
        &mut self,
        key: &MarkerKey,
        _record: &SearchableRecord,
        label: &str,
        _on_click: MarkerClick,
    ) -> u32 {
        self.next_handle += 1;
        self.calls.push(Call::Add(key.to_string(), label.to_string()));
        self.next_handle
    }

    fn remove_marker(&mut self, key: &MarkerKey, handle: u32) {
        self.calls.push(Call::Remove(key.to_string(), handle));
    }

    fn clear_markers(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn update_marker_label(&mut self, key: &MarkerKey, handle: &u32, label: &str) {
        self.calls
            .push(Call::Label(key.to_string(), *handle, label.to_string()));
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.calls.push(Call::Fit(bounds));
    }
}

fn rec(id: &str, lat: f64) -> SearchableRecord {
    SearchableRecord::new(SourceTag::Local, id, id.to_uppercase(), "", Category::Other)
        .with_coordinates(lat, 127.0)
}

fn key(id: &str) -> MarkerKey {
    MarkerKey::new(SourceTag::Local, id)
}

fn keys(ids: &[&str]) -> HashSet<MarkerKey> {
    ids.iter().map(|id| key(id)).collect()
}

#[test]
fn diff_is_minimal() {
    let previous = [key("a"), key("b"), key("c")];
    let diff = diff_geometry(&previous, &[rec("b", 1.0), rec("c", 2.0), rec("d", 3.0)]);
    assert_eq!(diff.to_add, [key("d")]);
    assert_eq!(diff.to_remove, [key("a")]);
}

#[test]
fn diff_skips_records_without_coordinates() {
    let previous = [key("a")];
    let unplaced = SearchableRecord::new(SourceTag::Local, "a", "A", "", Category::Other);
    let diff = diff_geometry(&previous, &[unplaced, rec("b", 1.0)]);
    assert_eq!(diff.to_add, [key("b")]);
    assert_eq!(diff.to_remove, [key("a")]);
}

#[test]
fn diff_distinguishes_sources_with_same_id() {
    let public = SearchableRecord::new(SourceTag::Public, "a", "A", "", Category::Other)
        .with_coordinates(1.0, 1.0);
    let diff = diff_geometry(&[key("a")], &[rec("a", 1.0), public]);
    assert_eq!(diff.to_add, [MarkerKey::new(SourceTag::Public, "a")]);
    assert!(diff.to_remove.is_empty());
}

#[test]
fn selection_changes_is_symmetric_difference() {
    let changed = selection_changes(&keys(&["a", "b"]), &keys(&["b", "c"]));
    assert_eq!(changed.into_iter().collect::<Vec<_>>(), [key("a"), key("c")]);
    assert!(selection_changes(&keys(&["a"]), &keys(&["a"])).is_empty());
}

#[test]
fn label_marks_selected() {
    assert_eq!(marker_label("Onion", true), "✓ Onion");
    assert_eq!(marker_label("Onion", false), "Onion");
}

#[test]
fn geometry_pass_touches_only_changed_markers() {
    let mut surface = RecordingSurface::default();
    let mut reconciler = MarkerReconciler::default();

    let report = reconciler.sync_geometry(&mut surface, &[rec("a", 1.0), rec("b", 2.0), rec("c", 3.0)]);
    assert_eq!(report.added, 3);
    assert!(report.fitted);
    surface.take();

    let report = reconciler.sync_geometry(&mut surface, &[rec("b", 2.0), rec("c", 3.0), rec("d", 4.0)]);
    assert_eq!(
        report,
        GeometryReport {
            added: 1,
            removed: 1,
            fitted: true
        }
    );
    assert_eq!(
        surface.take(),
        [
            Call::Remove("local:a".into(), 1),
            Call::Add("local:d".into(), "D".into()),
            Call::Fit(Bounds {
                south: 2.0,
                west: 127.0,
                north: 4.0,
                east: 127.0,
            }),
        ]
    );
    assert_eq!(reconciler.keys(), [key("b"), key("c"), key("d")]);
}

#[test]
fn removal_only_does_not_refit() {
    let mut surface = RecordingSurface::default();
    let mut reconciler = MarkerReconciler::default();
    reconciler.sync_geometry(&mut surface, &[rec("a", 1.0), rec("b", 2.0)]);
    surface.take();

    let report = reconciler.sync_geometry(&mut surface, &[rec("b", 2.0)]);
    assert!(!report.fitted);
    assert_eq!(surface.take(), [Call::Remove("local:a".into(), 1)]);
}

#[test]
fn non_finite_position_never_reaches_fit_bounds() {
    let mut surface = RecordingSurface::default();
    let mut reconciler = MarkerReconciler::default();
    let broken = SearchableRecord::new(SourceTag::External, "x", "X", "", Category::Other)
        .with_coordinates(f64::NAN, f64::INFINITY);

    let report = reconciler.sync_geometry(&mut surface, &[broken.clone()]);
    assert_eq!(report.added, 1);
    assert!(!report.fitted, "no finite point to fit");
    assert!(!surface.take().iter().any(|c| matches!(c, Call::Fit(_))));

    reconciler.sync_geometry(&mut surface, &[broken, rec("a", 1.0)]);
    assert_eq!(
        surface.take().last(),
        Some(&Call::Fit(Bounds {
            south: 1.0,
            west: 127.0,
            north: 1.0,
            east: 127.0,
        }))
    );
}

#[test]
fn unchanged_set_issues_no_calls() {
    let mut surface = RecordingSurface::default();
    let mut reconciler = MarkerReconciler::default();
    let records = [rec("a", 1.0), rec("b", 2.0)];
    reconciler.sync_geometry(&mut surface, &records);
    surface.take();

    assert_eq!(reconciler.sync_geometry(&mut surface, &records), GeometryReport::default());
    assert!(surface.take().is_empty());
}

#[test]
fn selection_pass_relabels_one_marker_without_geometry_calls() {
    let mut surface = RecordingSurface::default();
    let mut reconciler = MarkerReconciler::default();
    reconciler.sync_geometry(&mut surface, &[rec("a", 1.0), rec("b", 2.0), rec("c", 3.0)]);
    surface.take();

    assert_eq!(reconciler.update_selection(&mut surface, [key("b")]), 1);
    assert_eq!(surface.take(), [Call::Label("local:b".into(), 2, "✓ B".into())]);
    assert!(reconciler.is_selected(&key("b")));

    assert_eq!(reconciler.update_selection(&mut surface, [key("c")]), 2);
    assert_eq!(
        surface.take(),
        [
            Call::Label("local:b".into(), 2, "B".into()),
            Call::Label("local:c".into(), 3, "✓ C".into()),
        ]
    );
}

#[test]
fn selection_of_undisplayed_key_is_remembered() {
    let mut surface = RecordingSurface::default();
    let mut reconciler = MarkerReconciler::default();

    assert_eq!(reconciler.update_selection(&mut surface, [key("z")]), 0);
    assert!(surface.take().is_empty());

    reconciler.sync_geometry(&mut surface, &[rec("z", 1.0)]);
    assert_eq!(surface.take()[0], Call::Add("local:z".into(), "✓ Z".into()));
}

#[test]
fn clear_forgets_markers_and_keeps_selection() {
    let mut surface = RecordingSurface::default();
    let mut reconciler = MarkerReconciler::default();
    reconciler.update_selection(&mut surface, [key("a")]);
    reconciler.sync_geometry(&mut surface, &[rec("a", 1.0)]);
    surface.take();

    reconciler.clear(&mut surface);
    assert_eq!(surface.take(), [Call::Clear]);
    assert!(reconciler.is_empty());
    assert!(reconciler.selection().contains(&key("a")));

    reconciler.sync_geometry(&mut surface, &[rec("a", 1.0)]);
    assert_eq!(surface.take()[0], Call::Add("local:a".into(), "✓ A".into()));
}

#[test]
fn click_callback_reaches_every_marker() {
    struct ClickingSurface;

    impl MapSurface for ClickingSurface {
        type Handle = ();

        fn add_marker(
            &mut self,
            key: &MarkerKey,
            _record: &SearchableRecord,
            _label: &str,
            on_click: MarkerClick,
        ) {
            on_click(key);
        }

        fn remove_marker(&mut self, _key: &MarkerKey, _handle: ()) {}
        fn clear_markers(&mut self) {}
        fn update_marker_label(&mut self, _key: &MarkerKey, _handle: &(), _label: &str) {}
        fn fit_bounds(&mut self, _bounds: Bounds) {}
    }

    let clicked = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&clicked);
    let mut reconciler = MarkerReconciler::new(Arc::new(move |key: &MarkerKey| {
        sink.lock().unwrap().push(key.to_string());
    }));

    reconciler.sync_geometry(&mut ClickingSurface, &[rec("a", 1.0), rec("b", 2.0)]);
    assert_eq!(*clicked.lock().unwrap(), ["local:a", "local:b"]);
}
