use std::collections::VecDeque;

/// Bounded most-recent-first list of searched keywords.
///
/// Re-searching a keyword moves it to the front instead of duplicating it
/// (comparison ignores case and surrounding whitespace).
#[derive(Debug, Clone)]
pub struct RecentQueries {
    capacity: usize,
    entries: VecDeque<String>,
}

impl RecentQueries {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, keyword: &str) {
        let keyword = keyword.trim();
        if keyword.is_empty() || self.capacity == 0 {
            return;
        }

        let folded = keyword.to_lowercase();
        self.entries.retain(|existing| existing.to_lowercase() != folded);
        self.entries.push_front(keyword.to_string());
        self.entries.truncate(self.capacity);
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
