// Typed record shapes shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Source records
// ---------------------------------------------------------------------------

/// A player from the players source. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Free-text role label, e.g. "Batter" or "Wicketkeeper/Batter".
    pub role: String,
    pub team: String,
}

/// Performance score for one player. Higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRank {
    pub player_id: String,
    pub rank: f64,
}

/// One user's team selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserSelection {
    pub user_name: String,
    pub roster: Roster,
}

// ---------------------------------------------------------------------------
// Roster slots
// ---------------------------------------------------------------------------

/// The 11 fixed roster positions, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterSlot {
    Batter1,
    Batter2,
    Batter3,
    Batter4,
    Batter5,
    Wicketkeeper,
    Bowler1,
    Bowler2,
    Bowler3,
    Bowler4,
    Bowler5,
}

impl RosterSlot {
    /// Every slot in declaration order. Resolution walks slots in this order.
    pub const ALL: [RosterSlot; 11] = [
        RosterSlot::Batter1,
        RosterSlot::Batter2,
        RosterSlot::Batter3,
        RosterSlot::Batter4,
        RosterSlot::Batter5,
        RosterSlot::Wicketkeeper,
        RosterSlot::Bowler1,
        RosterSlot::Bowler2,
        RosterSlot::Bowler3,
        RosterSlot::Bowler4,
        RosterSlot::Bowler5,
    ];

    /// Column header used by the selections sheet.
    pub fn column_name(self) -> &'static str {
        match self {
            RosterSlot::Batter1 => "Batter1",
            RosterSlot::Batter2 => "Batter2",
            RosterSlot::Batter3 => "Batter3",
            RosterSlot::Batter4 => "Batter4",
            RosterSlot::Batter5 => "Batter5",
            RosterSlot::Wicketkeeper => "Wicketkeeper",
            RosterSlot::Bowler1 => "Bowler1",
            RosterSlot::Bowler2 => "Bowler2",
            RosterSlot::Bowler3 => "Bowler3",
            RosterSlot::Bowler4 => "Bowler4",
            RosterSlot::Bowler5 => "Bowler5",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A user's roster: one optional player identifier per slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Roster {
    slots: [Option<String>; 11],
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `slot` to `player_id`. Blank identifiers clear the slot.
    pub fn set(&mut self, slot: RosterSlot, player_id: Option<String>) {
        self.slots[slot.index()] = player_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
    }

    /// Builder-style variant of [`Roster::set`].
    pub fn with(mut self, slot: RosterSlot, player_id: &str) -> Self {
        self.set(slot, Some(player_id.to_string()));
        self
    }

    pub fn get(&self, slot: RosterSlot) -> Option<&str> {
        self.slots[slot.index()].as_deref()
    }

    /// Non-empty slots with their identifiers, in declaration order.
    pub fn filled(&self) -> impl Iterator<Item = (RosterSlot, &str)> + '_ {
        RosterSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|id| (slot, id)))
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Derived records
// ---------------------------------------------------------------------------

/// One resolved roster entry, used for display next to the user's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDetail {
    pub name: String,
    pub role: String,
    pub rank: f64,
}

/// A user selection after aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScore {
    pub user_name: String,
    pub total_score: f64,
    pub team_details: Vec<TeamDetail>,
}
