// Leaderboard ordering.

use serde::Serialize;

use crate::model::UserScore;

/// Users ordered by total score, highest first.
///
/// Ties keep the order the scores were handed in (load order of the
/// selections source).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<UserScore>,
}

impl Leaderboard {
    pub fn entries(&self) -> &[UserScore] {
        &self.entries
    }

    /// The first `k` entries (or all of them if there are fewer).
    pub fn top(&self, k: usize) -> &[UserScore] {
        &self.entries[..k.min(self.entries.len())]
    }

    /// 1-based position of `user_name`, if present.
    pub fn position_of(&self, user_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.user_name == user_name)
            .map(|i| i + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<UserScore> {
        self.entries
    }
}

/// Sort users descending by `total_score`. The sort is stable.
pub fn rank_users(mut scores: Vec<UserScore>) -> Leaderboard {
    scores.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Leaderboard { entries: scores }
}
