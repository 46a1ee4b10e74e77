// Score aggregation: a user's total is the sum of their resolved ranks.

use crate::index::Indices;
use crate::model::{TeamDetail, UserScore, UserSelection};
use crate::roster::resolve_roster;

/// Sum of `rank` over all entries. An empty roster scores 0.
pub fn total_score(details: &[TeamDetail]) -> f64 {
    // `Sum` for floats starts from -0.0, which would print as "-0".
    details.iter().fold(0.0, |acc, d| acc + d.rank)
}

/// Resolve one selection and attach its total and team details.
pub fn score_selection(selection: &UserSelection, indices: &Indices) -> UserScore {
    let team_details = resolve_roster(selection, indices);
    UserScore {
        user_name: selection.user_name.clone(),
        total_score: total_score(&team_details),
        team_details,
    }
}

/// Score every selection, preserving input order.
pub fn score_all(selections: &[UserSelection], indices: &Indices) -> Vec<UserScore> {
    selections
        .iter()
        .map(|s| score_selection(s, indices))
        .collect()
}
