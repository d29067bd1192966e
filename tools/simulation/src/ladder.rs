//! Observer-side ladder view
//!
//! A locally cached, totally ordered picture of the ranking, updated
//! incrementally as single-competitor events arrive. The merge is a
//! replace-or-insert followed by a stable sort, so equal ratings keep
//! their relative order from the previous snapshot and a newly inserted
//! tie lands after the existing ones. Applying the same update twice is a
//! no-op the second time.

use types::competitor::Competitor;

#[derive(Debug, Default)]
pub struct LadderView {
    entries: Vec<Competitor>,
}

impl LadderView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole view from a full ranking fetch.
    pub fn seed(&mut self, snapshot: Vec<Competitor>) {
        let mut entries = snapshot;
        entries.sort_by(|a, b| b.rating.cmp(&a.rating));
        self.entries = entries;
    }

    /// Merge one competitor update into the view.
    pub fn apply_update(&mut self, competitor: Competitor) {
        match self.entries.iter_mut().find(|c| c.id == competitor.id) {
            Some(existing) => *existing = competitor,
            None => self.entries.push(competitor),
        }
        // Vec::sort_by is stable: ties keep their current positions, and
        // the freshly pushed entry sits last among its ties.
        self.entries.sort_by(|a, b| b.rating.cmp(&a.rating));
    }

    /// Owned copy of the current view, descending by rating.
    pub fn snapshot(&self) -> Vec<Competitor> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
