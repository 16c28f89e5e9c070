use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::intent::Intent;
use crate::ingest::types::NormalizedReview;

/// Label frequencies over a classified collection.
/// Every label, `Unclassified` included, is always present (possibly 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSummary {
    counts: BTreeMap<Intent, usize>,
}

impl Default for IntentSummary {
    fn default() -> Self {
        Self {
            counts: Intent::ALL.iter().map(|&i| (i, 0)).collect(),
        }
    }
}

impl IntentSummary {
    /// Tally a collection. A record whose `intent` is still `None` lands in
    /// `Unclassified` so the total always matches the collection length.
    pub fn tally<'a, I>(reviews: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedReview>,
    {
        let mut s = Self::default();
        for r in reviews {
            s.record(r.intent.unwrap_or(Intent::Unclassified));
        }
        s
    }

    pub fn record(&mut self, intent: Intent) {
        *self.counts.entry(intent).or_insert(0) += 1;
    }

    pub fn count(&self, intent: Intent) -> usize {
        self.counts.get(&intent).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Percentage share of `intent` (0.0 for an empty summary).
    pub fn share(&self, intent: Intent) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(intent) as f64 * 100.0 / total as f64
        }
    }

    /// `(label, count)` in priority order, `Unclassified` last.
    pub fn iter(&self) -> impl Iterator<Item = (Intent, usize)> + '_ {
        self.counts.iter().map(|(i, n)| (*i, *n))
    }

    /// Most frequent label; ties resolve by priority.
    pub fn dominant(&self) -> Option<Intent> {
        let mut best: Option<(Intent, usize)> = None;
        for (intent, n) in self.iter() {
            if n > best.map_or(0, |(_, b)| b) {
                best = Some((intent, n));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_every_bucket_at_zero() {
        let s = IntentSummary::default();
        assert_eq!(s.iter().count(), Intent::ALL.len());
        assert_eq!(s.count(Intent::Unclassified), 0);
        assert_eq!(s.total(), 0);
        assert_eq!(s.share(Intent::Praise), 0.0);
        assert_eq!(s.dominant(), None);
    }

    #[test]
    fn shares_and_dominant() {
        let mut s = IntentSummary::default();
        s.record(Intent::Praise);
        s.record(Intent::Praise);
        s.record(Intent::BugReport);
        s.record(Intent::Unclassified);
        assert_eq!(s.total(), 4);
        assert!((s.share(Intent::Praise) - 50.0).abs() < 1e-9);
        assert_eq!(s.dominant(), Some(Intent::Praise));
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let mut s = IntentSummary::default();
        s.record(Intent::BugReport);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["counts"]["bug_report"], 1);
        assert_eq!(v["counts"]["unclassified"], 0);
    }
}
