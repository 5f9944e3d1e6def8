//! In-memory source adapters for the local and public place collections.

use std::sync::{Arc, PoisonError, RwLock};

use placesync_core::{SearchableRecord, SourceTag};

/// Substring search over a read-only snapshot of one place collection.
///
/// The CRUD layer swaps in fresh snapshots with
/// [`replace_records`](Self::replace_records); searches never mutate them.
#[derive(Debug)]
pub struct CollectionAdapter {
    source: SourceTag,
    records: RwLock<Arc<[SearchableRecord]>>,
}

impl CollectionAdapter {
    /// Adapter over the user's own saved places.
    #[must_use]
    pub fn local(records: Vec<SearchableRecord>) -> Self {
        Self::new(SourceTag::Local, records)
    }

    /// Adapter over places shared publicly by other users.
    #[must_use]
    pub fn public(records: Vec<SearchableRecord>) -> Self {
        Self::new(SourceTag::Public, records)
    }

    fn new(source: SourceTag, records: Vec<SearchableRecord>) -> Self {
        Self {
            source,
            records: RwLock::new(retain_partition(source, records)),
        }
    }

    #[must_use]
    pub fn source(&self) -> SourceTag {
        self.source
    }

    /// Swap in a new snapshot of the collection.
    pub fn replace_records(&self, records: Vec<SearchableRecord>) {
        let snapshot = retain_partition(self.source, records);
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<[SearchableRecord]> {
        Arc::clone(&self.records.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Records whose name or address contains `keyword`, case-insensitively,
    /// in collection order. Never fails; no match is an empty list.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<SearchableRecord> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let snapshot = self.snapshot();
        let matches: Vec<SearchableRecord> = snapshot
            .iter()
            .filter(|record| {
                record.name.to_lowercase().contains(&needle)
                    || record.address.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        tracing::debug!(
            source = %self.source,
            keyword,
            count = matches.len(),
            "collection search complete"
        );
        matches
    }
}

/// Records tagged for another partition do not belong in this collection.
fn retain_partition(source: SourceTag, records: Vec<SearchableRecord>) -> Arc<[SearchableRecord]> {
    let total = records.len();
    let kept: Vec<SearchableRecord> = records
        .into_iter()
        .filter(|record| record.source() == source)
        .collect();
    if kept.len() != total {
        tracing::warn!(
            source = %source,
            dropped = total - kept.len(),
            "ignoring records tagged for a different source"
        );
    }
    kept.into()
}
