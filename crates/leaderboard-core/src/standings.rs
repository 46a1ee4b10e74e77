// Full computation over one loaded dataset.
//
// Two independent paths share the same raw data:
// 1. indices -> roster resolution -> scores -> leaderboard
// 2. role partitioning of ranked players

use serde::Serialize;
use tracing::info;

use crate::config::DisplayConfig;
use crate::index::Indices;
use crate::loader::Dataset;
use crate::model::UserScore;
use crate::ranking::{rank_users, Leaderboard};
use crate::roles::{partition_roles, RoleBuckets};
use crate::scoring::score_all;

/// Everything the report layer needs, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standings {
    pub leaderboard: Leaderboard,
    pub top_performers: RoleBuckets,
    /// Number of leaderboard users meant for display.
    pub top_users: usize,
}

impl Standings {
    pub fn compute(dataset: &Dataset, display: &DisplayConfig) -> Self {
        let indices = Indices::build(&dataset.players, &dataset.ranks);
        let scores = score_all(&dataset.selections, &indices);
        let unknown = dataset
            .selections
            .iter()
            .flat_map(|s| s.roster.filled())
            .filter(|(_, pid)| indices.player(pid).is_none())
            .count();
        drop(indices);

        let leaderboard = rank_users(scores);
        info!(
            "Ranked {} users ({} roster entries reference unknown players)",
            leaderboard.len(),
            unknown
        );

        let top_performers = partition_roles(&dataset.players, &dataset.ranks, display.top_per_role);
        info!(
            "Top performers: {} batters, {} wicketkeepers, {} bowlers",
            top_performers.batters.len(),
            top_performers.wicketkeepers.len(),
            top_performers.bowlers.len()
        );

        Self {
            leaderboard,
            top_performers,
            top_users: display.top_users,
        }
    }

    /// The leaderboard cut to the configured display size.
    pub fn top_users(&self) -> &[UserScore] {
        self.leaderboard.top(self.top_users)
    }
}
