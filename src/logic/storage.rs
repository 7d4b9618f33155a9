//! Match storage contract and the in-memory league implementation.

use crate::models::{League, MatchId, MatchRecord, Player, PlayerId, StorageError};
use chrono::{NaiveDate, Utc};

/// Persists resolved match outcomes.
pub trait MatchStorage {
    fn find_player(&self, id: PlayerId) -> Option<&Player>;

    fn create_match(
        &mut self,
        winner_id: PlayerId,
        loser_id: PlayerId,
        score: &str,
        is_draw: bool,
        played_at: NaiveDate,
    ) -> Result<MatchId, StorageError>;

    fn update_match(
        &mut self,
        match_id: MatchId,
        winner_id: PlayerId,
        loser_id: PlayerId,
        score: &str,
        is_draw: bool,
        played_at: NaiveDate,
    ) -> Result<(), StorageError>;
}

impl League {
    fn check_participants(&self, winner_id: PlayerId, loser_id: PlayerId) -> Result<(), StorageError> {
        if winner_id == loser_id {
            return Err(StorageError::SamePlayer);
        }
        self.approved_player(winner_id)?;
        self.approved_player(loser_id)?;
        Ok(())
    }
}

impl MatchStorage for League {
    fn find_player(&self, id: PlayerId) -> Option<&Player> {
        self.player(id)
    }

    fn create_match(
        &mut self,
        winner_id: PlayerId,
        loser_id: PlayerId,
        score: &str,
        is_draw: bool,
        played_at: NaiveDate,
    ) -> Result<MatchId, StorageError> {
        self.check_participants(winner_id, loser_id)?;
        let record = MatchRecord::new(winner_id, loser_id, score, is_draw, played_at);
        let id = record.id;
        self.matches.push(record);
        Ok(id)
    }

    fn update_match(
        &mut self,
        match_id: MatchId,
        winner_id: PlayerId,
        loser_id: PlayerId,
        score: &str,
        is_draw: bool,
        played_at: NaiveDate,
    ) -> Result<(), StorageError> {
        self.check_participants(winner_id, loser_id)?;
        let record = self
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(StorageError::MatchNotFound(match_id))?;
        record.winner_id = winner_id;
        record.loser_id = loser_id;
        record.score = score.to_string();
        record.is_draw = is_draw;
        record.played_at = played_at;
        record.updated_at = Utc::now();
        Ok(())
    }
}
