//! High-score ledger: the best runs, highest first, capped at ten.

use serde::{Deserialize, Serialize};

use crate::constants::HIGH_SCORE_CAPACITY;
use crate::events::GameEvent;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub name: String,
    pub score: u32,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub date_unix: u64,
    #[serde(default)]
    pub phases_completed: u32,
    #[serde(default)]
    pub victory: bool,
}

/// Sorted by score, descending.  Equal scores keep insertion order, so the
/// earlier run ranks higher.  Serialised as a plain JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HighScore>", into = "Vec<HighScore>")]
pub struct Ledger {
    entries: Vec<HighScore>,
}

impl From<Vec<HighScore>> for Ledger {
    fn from(mut entries: Vec<HighScore>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(HIGH_SCORE_CAPACITY);
        Self { entries }
    }
}

impl From<Ledger> for Vec<HighScore> {
    fn from(ledger: Ledger) -> Self {
        ledger.entries
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank_for(&self, score: u32) -> usize {
        self.entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len())
    }

    /// Whether `score` would make the table.
    pub fn qualifies(&self, score: u32) -> bool {
        self.rank_for(score) < HIGH_SCORE_CAPACITY
    }

    /// Inserts `entry` in rank order.  Returns its zero-based rank, or `None`
    /// if it did not make the table.
    pub fn record(&mut self, entry: HighScore) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        let rank = self.rank_for(entry.score);
        self.entries.insert(rank, entry);
        self.entries.truncate(HIGH_SCORE_CAPACITY);
        Some(rank)
    }

    /// Records a [`GameEvent::ScoreMilestone`]; other events are ignored.
    pub fn record_milestone(&mut self, event: &GameEvent, date_unix: u64) -> Option<usize> {
        let GameEvent::ScoreMilestone {
            name,
            score,
            phases_completed,
            victory,
        } = event
        else {
            return None;
        };
        self.record(HighScore {
            name: name.clone(),
            score: *score,
            date_unix,
            phases_completed: *phases_completed,
            victory: *victory,
        })
    }
}
