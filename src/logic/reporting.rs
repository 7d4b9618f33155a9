//! Reporting flow: preview an outcome for confirmation, then store it and notify the opponent.

use crate::logic::notify::{MatchNotification, Notifier};
use crate::logic::resolver::resolve;
use crate::logic::storage::MatchStorage;
use crate::models::{
    MatchId, MatchOutcome, PlayerId, ScoreSheet, Side, StorageError, ValidationError,
};
use chrono::NaiveDate;

/// Outcome shown to the reporting player before anything is stored.
/// Dropping it is how a report is cancelled.
pub fn preview(
    sheet: &ScoreSheet,
    reporter: PlayerId,
    opponent: PlayerId,
) -> Result<MatchOutcome, ValidationError> {
    resolve(sheet, reporter, opponent)
}

/// Ids of (reporter, opponent) for an outcome resolved with the reporter as side A.
fn participants(outcome: &MatchOutcome) -> (PlayerId, PlayerId) {
    match outcome.winner_side {
        Side::A => (outcome.winner_id, outcome.loser_id),
        Side::B => (outcome.loser_id, outcome.winner_id),
    }
}

/// Store a confirmed outcome, then tell the opponent.
///
/// Storage errors are returned and nothing is sent. Notification errors are only logged;
/// the stored match stands.
pub fn submit_outcome<S, N>(
    storage: &mut S,
    notifier: &N,
    outcome: &MatchOutcome,
    played_at: NaiveDate,
) -> Result<MatchId, StorageError>
where
    S: MatchStorage,
    N: Notifier + ?Sized,
{
    let match_id = storage.create_match(
        outcome.winner_id,
        outcome.loser_id,
        &outcome.score,
        outcome.is_draw,
        played_at,
    )?;
    log::info!(
        "Stored match {}: {} ({})",
        match_id,
        outcome.score,
        if outcome.is_draw { "draw" } else { "decided" }
    );

    let (reporter_id, opponent_id) = participants(outcome);
    let notification = match (storage.find_player(reporter_id), storage.find_player(opponent_id)) {
        (Some(reporter), Some(opponent)) => MatchNotification::for_opponent(
            match_id,
            reporter,
            opponent,
            &outcome.score,
            outcome.is_draw,
            outcome.winner_id == opponent_id,
            played_at,
        ),
        _ => {
            log::warn!("Match {}: participant missing after store, no notification sent", match_id);
            return Ok(match_id);
        }
    };
    if let Err(e) = notifier.notify_opponent(&notification) {
        log::warn!("Match {}: {}", match_id, e);
    }
    Ok(match_id)
}

/// Replace a stored match with a corrected outcome (admin edit). Nobody is notified.
pub fn amend_outcome<S: MatchStorage>(
    storage: &mut S,
    match_id: MatchId,
    outcome: &MatchOutcome,
    played_at: NaiveDate,
) -> Result<(), StorageError> {
    storage.update_match(
        match_id,
        outcome.winner_id,
        outcome.loser_id,
        &outcome.score,
        outcome.is_draw,
        played_at,
    )?;
    log::info!("Amended match {}: {}", match_id, outcome.score);
    Ok(())
}
