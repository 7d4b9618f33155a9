//! Stored match rows.

use crate::models::player::PlayerId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A played match as persisted by the league.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    /// For a draw this is the reporting side; read `is_draw` first.
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub score: String,
    pub is_draw: bool,
    pub played_at: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(
        winner_id: PlayerId,
        loser_id: PlayerId,
        score: impl Into<String>,
        is_draw: bool,
        played_at: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            winner_id,
            loser_id,
            score: score.into(),
            is_draw,
            played_at,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.winner_id == player || self.loser_id == player
    }

    /// The other participant, if `player` took part.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if self.winner_id == player {
            Some(self.loser_id)
        } else if self.loser_id == player {
            Some(self.winner_id)
        } else {
            None
        }
    }
}
