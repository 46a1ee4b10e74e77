// Role classification and top performers per role.

use serde::Serialize;

use crate::index::build_rank_index;
use crate::model::{Player, PlayerRank};

/// Role bucket a player can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Batter,
    Wicketkeeper,
    Bowler,
}

impl Role {
    /// Classification order. A label containing several tokens lands in the
    /// first bucket listed here, so "Wicketkeeper/Batter" is a batter.
    pub const ALL: [Role; 3] = [Role::Batter, Role::Wicketkeeper, Role::Bowler];

    fn token(self) -> &'static str {
        match self {
            Role::Batter => "batter",
            Role::Wicketkeeper => "wicketkeeper",
            Role::Bowler => "bowler",
        }
    }

    /// Case-insensitive substring classification of a free-text role label.
    /// Returns `None` for labels matching none of the tokens (e.g. "All-rounder").
    pub fn classify(label: &str) -> Option<Role> {
        let label = label.to_lowercase();
        Role::ALL.into_iter().find(|r| label.contains(r.token()))
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Batter => "Batters",
            Role::Wicketkeeper => "Wicketkeepers",
            Role::Bowler => "Bowlers",
        }
    }
}

/// A ranked player in a role bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    pub id: String,
    pub name: String,
    pub role: String,
    pub team: String,
    pub rank: f64,
}

/// Top performers per role, each sorted by rank descending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleBuckets {
    pub batters: Vec<TopPerformer>,
    pub wicketkeepers: Vec<TopPerformer>,
    pub bowlers: Vec<TopPerformer>,
}

impl RoleBuckets {
    pub fn bucket(&self, role: Role) -> &[TopPerformer] {
        match role {
            Role::Batter => &self.batters,
            Role::Wicketkeeper => &self.wicketkeepers,
            Role::Bowler => &self.bowlers,
        }
    }

    fn bucket_mut(&mut self, role: Role) -> &mut Vec<TopPerformer> {
        match role {
            Role::Batter => &mut self.batters,
            Role::Wicketkeeper => &mut self.wicketkeepers,
            Role::Bowler => &mut self.bowlers,
        }
    }
}

/// Bucket ranked players by role and keep the `k` best of each.
///
/// Players without a rank record are left out. Unclassifiable roles are left
/// out. Player records are walked in load order, and equal ranks keep that
/// order.
pub fn partition_roles(players: &[Player], ranks: &[PlayerRank], k: usize) -> RoleBuckets {
    let rank_index = build_rank_index(ranks);
    let mut buckets = RoleBuckets::default();

    for p in players {
        let Some(&rank) = rank_index.get(&p.id) else {
            continue;
        };
        let Some(role) = Role::classify(&p.role) else {
            continue;
        };
        buckets.bucket_mut(role).push(TopPerformer {
            id: p.id.clone(),
            name: p.name.clone(),
            role: p.role.clone(),
            team: p.team.clone(),
            rank,
        });
    }

    for role in Role::ALL {
        let bucket = buckets.bucket_mut(role);
        bucket.sort_by(|a, b| b.rank.partial_cmp(&a.rank).unwrap_or(std::cmp::Ordering::Equal));
        bucket.truncate(k);
    }

    buckets
}
