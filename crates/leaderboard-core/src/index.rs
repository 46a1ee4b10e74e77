// Lookup indices over the player and rank sources.
//
// Both indices are keyed by player identifier. When an identifier repeats,
// the later record wins. Nothing in the sources promises uniqueness, so a
// repeat is logged rather than treated as an error.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{Player, PlayerRank};

/// Descriptive fields of a player, keyed by identifier in [`Indices`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfo {
    pub name: String,
    pub role: String,
    pub team: String,
}

/// Read-only lookup tables built once per run.
#[derive(Debug, Clone, Default)]
pub struct Indices {
    pub players: HashMap<String, PlayerInfo>,
    pub ranks: HashMap<String, f64>,
}

impl Indices {
    pub fn build(players: &[Player], ranks: &[PlayerRank]) -> Self {
        Self {
            players: build_player_index(players),
            ranks: build_rank_index(ranks),
        }
    }

    pub fn player(&self, id: &str) -> Option<&PlayerInfo> {
        self.players.get(id)
    }

    pub fn rank(&self, id: &str) -> Option<f64> {
        self.ranks.get(id).copied()
    }
}

/// Map player identifier to its descriptive fields (last write wins).
pub fn build_player_index(players: &[Player]) -> HashMap<String, PlayerInfo> {
    let mut index = HashMap::with_capacity(players.len());
    for p in players {
        let info = PlayerInfo {
            name: p.name.clone(),
            role: p.role.clone(),
            team: p.team.clone(),
        };
        if index.insert(p.id.clone(), info).is_some() {
            debug!("duplicate player id '{}', using latest record", p.id);
        }
    }
    index
}

/// Map player identifier to rank (last write wins).
pub fn build_rank_index(ranks: &[PlayerRank]) -> HashMap<String, f64> {
    let mut index = HashMap::with_capacity(ranks.len());
    for r in ranks {
        if index.insert(r.player_id.clone(), r.rank).is_some() {
            debug!("duplicate rank for player id '{}', using latest value", r.player_id);
        }
    }
    index
}
