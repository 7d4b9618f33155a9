//! Data structures for the tennis league: players, matches, set scores.

mod league;
mod match_record;
mod player;
mod score;

pub use league::{League, StorageError};
pub use match_record::{MatchId, MatchRecord};
pub use player::{Category, Player, PlayerId, PlayerRecord, Trophy};
pub use score::{MatchOutcome, ScoreForm, ScoreSheet, SetEntry, SetScore, Side, ValidationError};
