//! Source-prioritised merge of the three result lists.

use placesync_core::{MergedResult, SearchableRecord};

use crate::matcher::is_same_duplicate;

/// Merge local, public and external results into one list.
///
/// Output order is `local ++ public ++ external`, each sublist in its
/// original order. Local and public records are authoritative and always
/// kept; an external record is dropped when it duplicates any record in the
/// union of local and public.
#[must_use]
pub fn merge(
    local: Vec<SearchableRecord>,
    public: Vec<SearchableRecord>,
    external: Vec<SearchableRecord>,
) -> Vec<MergedResult> {
    let mut merged = Vec::with_capacity(local.len() + public.len() + external.len());
    merged.extend(local.into_iter().map(MergedResult::from_record));
    merged.extend(public.into_iter().map(MergedResult::from_record));

    let authoritative = merged.len();
    for candidate in external {
        let duplicate = merged[..authoritative]
            .iter()
            .any(|kept| is_same_duplicate(&kept.record, &candidate));
        if duplicate {
            tracing::debug!(
                external_id = %candidate.id,
                name = %candidate.name,
                "suppressing external result duplicated by a saved place"
            );
        } else {
            merged.push(MergedResult::from_record(candidate));
        }
    }

    merged
}
