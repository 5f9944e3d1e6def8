//! Approximate same-place detection across sources.

use placesync_core::SearchableRecord;

/// Maximum per-axis coordinate delta (degrees, exclusive) for two records to
/// count as the same place. Roughly 50 m of latitude.
///
/// This is a flat lat/lng box, not a geodesic distance, so the covered
/// ground shrinks in longitude toward the poles.
pub const DUPLICATE_THRESHOLD_DEGREES: f64 = 0.0005;

/// Returns `true` when `a` and `b` look like the same real-world place:
/// case-insensitively equal names and both coordinate deltas strictly below
/// [`DUPLICATE_THRESHOLD_DEGREES`].
///
/// Records missing either coordinate are never duplicates. Symmetric but not
/// transitive.
#[must_use]
pub fn is_same_duplicate(a: &SearchableRecord, b: &SearchableRecord) -> bool {
    let (Some((a_lat, a_lng)), Some((b_lat, b_lng))) = (a.coordinates(), b.coordinates()) else {
        return false;
    };

    names_match(&a.name, &b.name)
        && (a_lat - b_lat).abs() < DUPLICATE_THRESHOLD_DEGREES
        && (a_lng - b_lng).abs() < DUPLICATE_THRESHOLD_DEGREES
}

fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
