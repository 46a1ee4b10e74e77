// Roster resolution: turn a user's slot identifiers into display entries.

use tracing::debug;

use crate::index::Indices;
use crate::model::{TeamDetail, UserSelection};

/// Resolve every non-empty slot of `selection`, in slot declaration order.
///
/// Missing reference data never fails resolution:
/// - an identifier with no rank record resolves to rank 0;
/// - an identifier with no player record uses the identifier itself as the
///   name and an empty role.
pub fn resolve_roster(selection: &UserSelection, indices: &Indices) -> Vec<TeamDetail> {
    selection
        .roster
        .filled()
        .map(|(slot, pid)| {
            let rank = indices.rank(pid).unwrap_or_else(|| {
                debug!(
                    "user '{}' slot {}: no rank for '{}', counting 0",
                    selection.user_name,
                    slot.column_name(),
                    pid
                );
                0.0
            });
            match indices.player(pid) {
                Some(info) => TeamDetail {
                    name: info.name.clone(),
                    role: info.role.clone(),
                    rank,
                },
                None => {
                    debug!(
                        "user '{}' slot {}: unknown player '{}'",
                        selection.user_name,
                        slot.column_name(),
                        pid
                    );
                    TeamDetail {
                        name: pid.to_string(),
                        role: String::new(),
                        rank,
                    }
                }
            }
        })
        .collect()
}
