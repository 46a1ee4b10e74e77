// Report output: the computed standings as a text table or JSON.

use std::io::Write;

use leaderboard_core::config::ReportFormat;
use leaderboard_core::model::UserScore;
use leaderboard_core::roles::{Role, RoleBuckets};
use leaderboard_core::standings::Standings;
use serde::Serialize;

/// What the JSON report contains: the display cut of the leaderboard plus
/// the role buckets.
#[derive(Serialize)]
struct ReportView<'a> {
    total_users: usize,
    leaderboard: &'a [UserScore],
    top_performers: &'a RoleBuckets,
}

pub fn write_report<W: Write>(
    out: &mut W,
    standings: &Standings,
    format: ReportFormat,
) -> anyhow::Result<()> {
    match format {
        ReportFormat::Text => write_text(out, standings)?,
        ReportFormat::Json => {
            let view = ReportView {
                total_users: standings.leaderboard.len(),
                leaderboard: standings.top_users(),
                top_performers: &standings.top_performers,
            };
            serde_json::to_writer_pretty(&mut *out, &view)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(out: &mut W, standings: &Standings) -> std::io::Result<()> {
    let top = standings.top_users();
    writeln!(
        out,
        "Leaderboard (top {} of {})",
        top.len(),
        standings.leaderboard.len()
    )?;
    if top.is_empty() {
        writeln!(out, "  no selections")?;
    }
    for (i, user) in top.iter().enumerate() {
        writeln!(out, "{:>3}. {:<24} {:>8}", i + 1, user.user_name, user.total_score)?;
        for d in &user.team_details {
            if d.role.is_empty() {
                writeln!(out, "       {:<30} {:>6}", d.name, d.rank)?;
            } else {
                let label = format!("{} ({})", d.name, d.role);
                writeln!(out, "       {:<30} {:>6}", label, d.rank)?;
            }
        }
    }

    for role in Role::ALL {
        writeln!(out)?;
        writeln!(out, "Top {}", role.label())?;
        let bucket = standings.top_performers.bucket(role);
        if bucket.is_empty() {
            writeln!(out, "  none ranked")?;
        }
        for (i, p) in bucket.iter().enumerate() {
            let label = format!("{} ({})", p.name, p.team);
            writeln!(out, "{:>3}. {:<30} {:>6}", i + 1, label, p.rank)?;
        }
    }
    Ok(())
}
