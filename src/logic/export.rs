//! CSV export of stored matches.

use crate::models::{League, PlayerId};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct MatchRow<'a> {
    played_at: String,
    winner: &'a str,
    loser: &'a str,
    score: &'a str,
    draw: bool,
}

/// Write all matches, oldest played first, with player names resolved.
pub fn export_matches_csv<W: Write>(league: &League, writer: W) -> Result<(), csv::Error> {
    let name = |id: PlayerId| league.player(id).map(|p| p.name.as_str()).unwrap_or("(removed)");
    let mut matches: Vec<_> = league.matches.iter().collect();
    matches.sort_by_key(|m| m.played_at);

    let mut wtr = csv::Writer::from_writer(writer);
    for m in matches {
        wtr.serialize(MatchRow {
            played_at: m.played_at.format("%Y-%m-%d").to_string(),
            winner: name(m.winner_id),
            loser: name(m.loser_id),
            score: &m.score,
            draw: m.is_draw,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
