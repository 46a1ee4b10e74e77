// Record loading for the three source sheets (players, ranks, selections).
//
// Sheets are CSV exports with a header row. Each row is deserialized into a
// private raw struct, trimmed and checked, then converted into the typed
// records in `model`. A bad row is skipped with a warning. A source fails the
// load when it cannot be fetched, is not CSV, lacks its key column, or has
// data rows of which none are valid.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::SourcesConfig;
use crate::model::{Player, PlayerRank, Roster, RosterSlot, UserSelection};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Where a source sheet is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Path(PathBuf),
    Url(String),
}

impl SourceLocation {
    /// `http://` and `https://` values are URLs. Anything else is a path,
    /// joined onto `base_dir` when relative.
    pub fn parse(value: &str, base_dir: &Path) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            SourceLocation::Url(value.to_string())
        } else {
            SourceLocation::Path(base_dir.join(value))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Path(p) => write!(f, "{}", p.display()),
            SourceLocation::Url(u) => f.write_str(u),
        }
    }
}

/// Everything the pipeline consumes, in source load order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub players: Vec<Player>,
    pub ranks: Vec<PlayerRank>,
    pub selections: Vec<UserSelection>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {source_name} source {path}: {source}")]
    Io {
        source_name: &'static str,
        path: String,
        source: std::io::Error,
    },

    #[error("failed to fetch {source_name} source {url}: {source}")]
    Http {
        source_name: &'static str,
        url: String,
        source: reqwest::Error,
    },

    #[error("{source_name} source {url} returned HTTP {status}")]
    Status {
        source_name: &'static str,
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("CSV error in {source_name} source: {source}")]
    Csv {
        source_name: &'static str,
        source: csv::Error,
    },

    #[error("invalid {source_name} source: {message}")]
    Validation {
        source_name: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Players sheet row. Descriptive columns default to empty when absent.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayer {
    #[serde(alias = "player_id")]
    PlayerId: String,
    #[serde(default, alias = "name")]
    Name: String,
    #[serde(default, alias = "role")]
    Role: String,
    #[serde(default, alias = "team_name", alias = "Team")]
    TeamName: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRank {
    #[serde(alias = "player_id")]
    PlayerId: String,
    #[serde(alias = "rank")]
    Rank: f64,
}

/// Selections sheet row. Every slot column is optional; an absent column and
/// an empty cell both mean an empty slot.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawSelection {
    #[serde(alias = "user_name")]
    UserName: String,
    #[serde(default, alias = "batter1")]
    Batter1: Option<String>,
    #[serde(default, alias = "batter2")]
    Batter2: Option<String>,
    #[serde(default, alias = "batter3")]
    Batter3: Option<String>,
    #[serde(default, alias = "batter4")]
    Batter4: Option<String>,
    #[serde(default, alias = "batter5")]
    Batter5: Option<String>,
    #[serde(default, alias = "wicketkeeper")]
    Wicketkeeper: Option<String>,
    #[serde(default, alias = "bowler1")]
    Bowler1: Option<String>,
    #[serde(default, alias = "bowler2")]
    Bowler2: Option<String>,
    #[serde(default, alias = "bowler3")]
    Bowler3: Option<String>,
    #[serde(default, alias = "bowler4")]
    Bowler4: Option<String>,
    #[serde(default, alias = "bowler5")]
    Bowler5: Option<String>,
}

impl RawSelection {
    fn into_selection(self) -> UserSelection {
        let mut roster = Roster::new();
        let values = [
            self.Batter1,
            self.Batter2,
            self.Batter3,
            self.Batter4,
            self.Batter5,
            self.Wicketkeeper,
            self.Bowler1,
            self.Bowler2,
            self.Bowler3,
            self.Bowler4,
            self.Bowler5,
        ];
        for (slot, value) in RosterSlot::ALL.into_iter().zip(values) {
            roster.set(slot, value);
        }
        UserSelection {
            user_name: self.UserName,
            roster,
        }
    }
}

// ---------------------------------------------------------------------------
// Reader-based parsers (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr)
}

/// Read one sheet row by row, keeping what `convert` accepts.
///
/// The header row must carry the sheet's key column. Rows that fail to
/// deserialize are skipped with a warning, but a sheet whose data rows are all
/// rejected is an error: that is a wrong file, not a few bad rows.
fn parse_sheet<R, Raw, T>(
    rdr: R,
    source_name: &'static str,
    key_column: [&str; 2],
    mut convert: impl FnMut(Raw) -> Option<T>,
) -> Result<Vec<T>, LoadError>
where
    R: Read,
    Raw: DeserializeOwned,
{
    let mut reader = csv_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| LoadError::Csv {
            source_name,
            source: e,
        })?
        .clone();

    // A zero-byte export is an empty sheet.
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if !headers.iter().any(|h| key_column.contains(&h)) {
        return Err(LoadError::Validation {
            source_name,
            message: format!("missing required column '{}'", key_column[0]),
        });
    }

    let mut rows = 0usize;
    let mut records = Vec::new();
    for result in reader.deserialize::<Raw>() {
        rows += 1;
        match result {
            Ok(raw) => records.extend(convert(raw)),
            Err(e) => {
                warn!("skipping malformed {} row: {}", source_name, e);
            }
        }
    }

    if rows > 0 && records.is_empty() {
        return Err(LoadError::Validation {
            source_name,
            message: format!("none of {} data rows are valid", rows),
        });
    }
    Ok(records)
}

fn players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, LoadError> {
    parse_sheet(rdr, "players", ["PlayerId", "player_id"], |raw: RawPlayer| {
        if raw.PlayerId.is_empty() {
            warn!("skipping player '{}': empty PlayerId", raw.Name);
            return None;
        }
        Some(Player {
            id: raw.PlayerId,
            name: raw.Name,
            role: raw.Role,
            team: raw.TeamName,
        })
    })
}

fn ranks_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRank>, LoadError> {
    parse_sheet(rdr, "ranks", ["PlayerId", "player_id"], |raw: RawRank| {
        if raw.PlayerId.is_empty() {
            warn!("skipping rank row: empty PlayerId");
            return None;
        }
        if !raw.Rank.is_finite() {
            warn!("skipping rank for '{}': non-finite value", raw.PlayerId);
            return None;
        }
        Some(PlayerRank {
            player_id: raw.PlayerId,
            rank: raw.Rank,
        })
    })
}

fn selections_from_reader<R: Read>(rdr: R) -> Result<Vec<UserSelection>, LoadError> {
    parse_sheet(rdr, "selections", ["UserName", "user_name"], |raw: RawSelection| {
        if raw.UserName.is_empty() {
            warn!("skipping selection row: empty UserName");
            return None;
        }
        Some(raw.into_selection())
    })
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Read the raw bytes of one source, from disk or over HTTP.
pub async fn fetch_source(
    http: &reqwest::Client,
    source_name: &'static str,
    location: &SourceLocation,
) -> Result<Vec<u8>, LoadError> {
    match location {
        SourceLocation::Path(path) => {
            tokio::fs::read(path).await.map_err(|e| LoadError::Io {
                source_name,
                path: path.display().to_string(),
                source: e,
            })
        }
        SourceLocation::Url(url) => {
            let http_err = |e: reqwest::Error| LoadError::Http {
                source_name,
                url: url.clone(),
                source: e,
            };
            let resp = http.get(url).send().await.map_err(http_err)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    source_name,
                    url: url.clone(),
                    status,
                });
            }
            let body = resp.bytes().await.map_err(http_err)?;
            Ok(body.to_vec())
        }
    }
}

// ---------------------------------------------------------------------------
// Public loaders
// ---------------------------------------------------------------------------

pub async fn load_players(
    http: &reqwest::Client,
    location: &SourceLocation,
) -> Result<Vec<Player>, LoadError> {
    let bytes = fetch_source(http, "players", location).await?;
    let players = players_from_reader(bytes.as_slice())?;
    info!("Loaded {} players from {}", players.len(), location);
    Ok(players)
}

pub async fn load_ranks(
    http: &reqwest::Client,
    location: &SourceLocation,
) -> Result<Vec<PlayerRank>, LoadError> {
    let bytes = fetch_source(http, "ranks", location).await?;
    let ranks = ranks_from_reader(bytes.as_slice())?;
    info!("Loaded {} ranks from {}", ranks.len(), location);
    Ok(ranks)
}

pub async fn load_selections(
    http: &reqwest::Client,
    location: &SourceLocation,
) -> Result<Vec<UserSelection>, LoadError> {
    let bytes = fetch_source(http, "selections", location).await?;
    let selections = selections_from_reader(bytes.as_slice())?;
    info!("Loaded {} selections from {}", selections.len(), location);
    Ok(selections)
}

/// Load all three sources concurrently.
///
/// Returns only once every load has succeeded. The first failure ends the
/// join and drops the loads still in flight, so no partial dataset escapes.
pub async fn load_dataset(sources: &SourcesConfig) -> Result<Dataset, LoadError> {
    let http = reqwest::Client::new();
    let (players, ranks, selections) = tokio::try_join!(
        load_players(&http, &sources.players),
        load_ranks(&http, &sources.ranks),
        load_selections(&http, &sources.selections),
    )?;

    for (name, empty) in [
        ("players", players.is_empty()),
        ("ranks", ranks.is_empty()),
        ("selections", selections.is_empty()),
    ] {
        if empty {
            warn!("{} source has no data rows", name);
        }
    }

    Ok(Dataset {
        players,
        ranks,
        selections,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Source locations --

    #[test]
    fn parse_url_and_paths() {
        let base = Path::new("/base");
        assert_eq!(
            SourceLocation::parse("https://host/p.csv", base),
            SourceLocation::Url("https://host/p.csv".into())
        );
        assert_eq!(
            SourceLocation::parse("http://host/p.csv", base),
            SourceLocation::Url("http://host/p.csv".into())
        );
        assert_eq!(
            SourceLocation::parse("data/p.csv", base),
            SourceLocation::Path(PathBuf::from("/base/data/p.csv"))
        );
        assert_eq!(
            SourceLocation::parse("/abs/p.csv", base),
            SourceLocation::Path(PathBuf::from("/abs/p.csv"))
        );
    }

    // -- Players --

    #[test]
    fn players_csv_roundtrip() {
        let csv_data = "\
PlayerId,Name,Role,TeamName
P1,Virat Kohli,Batter,RCB
P2,Jasprit Bumrah,Bowler,MI";

        let players = players_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(
            players,
            vec![
                Player {
                    id: "P1".into(),
                    name: "Virat Kohli".into(),
                    role: "Batter".into(),
                    team: "RCB".into(),
                },
                Player {
                    id: "P2".into(),
                    name: "Jasprit Bumrah".into(),
                    role: "Bowler".into(),
                    team: "MI".into(),
                },
            ]
        );
    }

    #[test]
    fn players_numeric_ids_stay_strings() {
        let csv_data = "\
PlayerId,Name,Role,TeamName
101,A,Batter,X";

        let players = players_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players[0].id, "101");
    }

    #[test]
    fn players_missing_optional_columns_default_empty() {
        let csv_data = "\
PlayerId,Name
P1,A";

        let players = players_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].role, "");
        assert_eq!(players[0].team, "");
    }

    #[test]
    fn players_snake_case_headers_and_extra_columns() {
        let csv_data = "\
player_id,name,role,team_name,price
P1,A,Batter,X,9.5";

        let players = players_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players[0].id, "P1");
        assert_eq!(players[0].team, "X");
    }

    #[test]
    fn players_fields_trimmed_and_blank_ids_skipped() {
        let csv_data = "\
PlayerId,Name,Role,TeamName
  P1  ,  A  , Batter , X
   ,Ghost,Bowler,Y";

        let players = players_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, "P1");
        assert_eq!(players[0].name, "A");
        assert_eq!(players[0].role, "Batter");
    }

    // -- Ranks --

    #[test]
    fn ranks_csv_roundtrip() {
        let csv_data = "\
PlayerId,Rank
P1,80
P2,60.5";

        let ranks = ranks_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[0].player_id, "P1");
        assert_eq!(ranks[0].rank, 80.0);
        assert!((ranks[1].rank - 60.5).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_rank_rows_skipped() {
        let csv_data = "\
PlayerId,Rank
P1,80
P2,not_a_number
P3,
P4,NaN
P5,70";

        let ranks = ranks_from_reader(csv_data.as_bytes()).unwrap();
        let ids: Vec<&str> = ranks.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P5"]);
    }

    #[test]
    fn duplicate_ranks_are_all_kept_in_order() {
        let csv_data = "\
PlayerId,Rank
P1,10
P1,20";

        let ranks = ranks_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[1].rank, 20.0);
    }

    #[test]
    fn empty_csv_returns_empty_vec() {
        let ranks = ranks_from_reader("PlayerId,Rank".as_bytes()).unwrap();
        assert!(ranks.is_empty());
    }

    #[test]
    fn zero_byte_sheet_is_empty() {
        let ranks = ranks_from_reader("".as_bytes()).unwrap();
        assert!(ranks.is_empty());
    }

    #[test]
    fn ranks_without_key_column_rejected() {
        let csv_data = "\
Id,Score
P1,72
P2,65";

        let err = ranks_from_reader(csv_data.as_bytes()).unwrap_err();
        match err {
            LoadError::Validation {
                source_name,
                message,
            } => {
                assert_eq!(source_name, "ranks");
                assert!(message.contains("PlayerId"));
            }
            other => panic!("expected Validation error, got: {other}"),
        }
    }

    #[test]
    fn ranks_with_no_valid_row_rejected() {
        let csv_data = "\
PlayerId,Rank
P1,eighty
,40
P3,inf";

        let err = ranks_from_reader(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation {
                source_name: "ranks",
                ..
            }
        ));
    }

    #[test]
    fn non_utf8_header_is_csv_error() {
        let bytes: &[u8] = &[0xff, 0xfe, 0x00, 0x9c, b',', 0xc3, b'\n', 0x01, b',', 0x02];
        let err = players_from_reader(bytes).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Csv {
                source_name: "players",
                ..
            }
        ));
    }

    // -- Selections --

    #[test]
    fn selections_full_roster() {
        let csv_data = "\
UserName,Batter1,Batter2,Batter3,Batter4,Batter5,Wicketkeeper,Bowler1,Bowler2,Bowler3,Bowler4,Bowler5
alice,P1,P2,P3,P4,P5,P6,P7,P8,P9,P10,P11";

        let selections = selections_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].user_name, "alice");
        assert_eq!(selections[0].roster.filled_count(), 11);
        assert_eq!(selections[0].roster.get(RosterSlot::Wicketkeeper), Some("P6"));
        assert_eq!(selections[0].roster.get(RosterSlot::Bowler5), Some("P11"));
    }

    #[test]
    fn selections_empty_cells_are_empty_slots() {
        let csv_data = "\
UserName,Batter1,Batter2,Batter3,Batter4,Batter5,Wicketkeeper,Bowler1,Bowler2,Bowler3,Bowler4,Bowler5
bob,P1,,,,,  ,P7,,,,";

        let selections = selections_from_reader(csv_data.as_bytes()).unwrap();
        let roster = &selections[0].roster;
        assert_eq!(roster.filled_count(), 2);
        assert_eq!(roster.get(RosterSlot::Batter1), Some("P1"));
        assert_eq!(roster.get(RosterSlot::Wicketkeeper), None);
        assert_eq!(roster.get(RosterSlot::Bowler1), Some("P7"));
    }

    #[test]
    fn selections_missing_slot_columns_are_empty_slots() {
        let csv_data = "\
UserName,Batter1,Bowler1
carol,P1,P2";

        let selections = selections_from_reader(csv_data.as_bytes()).unwrap();
        let roster = &selections[0].roster;
        assert_eq!(roster.filled_count(), 2);
        assert_eq!(roster.get(RosterSlot::Batter2), None);
    }

    #[test]
    fn selections_blank_user_skipped() {
        let csv_data = "\
UserName,Batter1
,P1
dave,P2";

        let selections = selections_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].user_name, "dave");
    }

    #[test]
    fn selections_without_user_column_rejected() {
        let csv_data = "\
Name,Batter1
alice,P1";

        let err = selections_from_reader(csv_data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("UserName"));
    }

    #[test]
    fn selections_keep_load_order() {
        let csv_data = "\
UserName,Batter1
zed,P1
amy,P2
kim,P3";

        let selections = selections_from_reader(csv_data.as_bytes()).unwrap();
        let names: Vec<&str> = selections.iter().map(|s| s.user_name.as_str()).collect();
        assert_eq!(names, vec!["zed", "amy", "kim"]);
    }

    // -- Fetching --

    #[tokio::test]
    async fn fetch_missing_file_is_io_error() {
        let http = reqwest::Client::new();
        let location = SourceLocation::Path(PathBuf::from("/definitely/not/here.csv"));
        let err = fetch_source(&http, "players", &location).await.unwrap_err();
        match err {
            LoadError::Io { source_name, path, .. } => {
                assert_eq!(source_name, "players");
                assert!(path.ends_with("here.csv"));
            }
            other => panic!("expected Io error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn load_ranks_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranks.csv");
        std::fs::write(&path, "PlayerId,Rank\nP1,3\nP2,4\n").unwrap();

        let http = reqwest::Client::new();
        let ranks = load_ranks(&http, &SourceLocation::Path(path)).await.unwrap();
        assert_eq!(ranks.len(), 2);
    }
}
