//! Recent prediction history.

use std::collections::VecDeque;

use road_safety_api_models::PredictionResult;

/// Number of predictions kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Most-recent-first list of predictions, bounded to a fixed capacity.
///
/// Lives only as long as the page that owns it.
#[derive(Debug, Clone)]
pub struct PredictionHistory {
    entries: VecDeque<PredictionResult>,
    capacity: usize,
}

impl Default for PredictionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl PredictionHistory {
    /// Creates an empty history holding at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds `result` as the most recent entry, evicting the oldest entry
    /// once the capacity is exceeded.
    pub fn push(&mut self, result: PredictionResult) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(result);
        self.entries.truncate(self.capacity);
    }

    /// The most recent prediction.
    #[must_use]
    pub fn latest(&self) -> Option<&PredictionResult> {
        self.entries.front()
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &PredictionResult> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use road_safety_accident_models::Severity;
    use road_safety_api_models::PredictionInput;

    use super::*;

    fn result(id: usize) -> PredictionResult {
        PredictionResult {
            id: id.to_string(),
            severity: Severity::Slight,
            confidence: 85.7,
            factors: BTreeMap::new(),
            needs_review: false,
            recommendation: String::new(),
            timestamp: Utc::now(),
            conditions: PredictionInput::default(),
        }
    }

    #[test]
    fn keeps_most_recent_ten() {
        let mut history = PredictionHistory::default();
        for i in 1..=11 {
            history.push(result(i));
        }

        assert_eq!(history.len(), 10);
        let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["11", "10", "9", "8", "7", "6", "5", "4", "3", "2"]);
        assert_eq!(history.latest().map(|r| r.id.as_str()), Some("11"));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = PredictionHistory::with_capacity(0);
        history.push(result(1));
        assert!(history.is_empty());
    }
}
