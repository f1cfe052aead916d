//! Bounded online collector for scored results

/// An item together with the score it was kept for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredResult<T> {
    pub item: T,
    pub score: i32,
}

/// Keeps at most `limit` scored items while results stream in
///
/// Once full, a new item replaces the first kept entry (in slot order) whose
/// score is strictly lower, or is dropped if there is none. This is not a
/// true top-K: it may keep an entry that a later, better item should have
/// displaced instead of a worse one further along.
#[derive(Debug, Clone)]
pub struct BoundedTopK<T> {
    limit: usize,
    entries: Vec<ScoredResult<T>>,
    total_matches: usize,
}

impl<T> BoundedTopK<T> {
    /// Create a collector; a limit of 0 keeps everything
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: Vec::new(),
            total_matches: 0,
        }
    }

    /// Offer an item; negative scores are ignored
    pub fn add(&mut self, item: T, score: i32) {
        if score < 0 {
            return;
        }
        self.total_matches += 1;

        if !self.is_full() {
            self.entries.push(ScoredResult { item, score });
            return;
        }
        if let Some(slot) = self.entries.iter_mut().find(|e| e.score < score) {
            *slot = ScoredResult { item, score };
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once a bounded collector holds `limit` entries
    pub fn is_full(&self) -> bool {
        self.limit > 0 && self.entries.len() >= self.limit
    }

    /// Every non-negative score offered, kept or not
    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    /// Kept entries by descending score; ties stay in slot order
    pub fn into_scored_results(mut self) -> Vec<ScoredResult<T>> {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries
    }

    /// Kept items by descending score
    pub fn into_results(self) -> Vec<T> {
        self.into_scored_results()
            .into_iter()
            .map(|e| e.item)
            .collect()
    }
}
