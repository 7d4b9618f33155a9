//! Match result resolution: validate two set scores, pick the winner, render the score.

use crate::logic::scoring::{is_set_complete, is_valid_set_score, set_winner, SET_BONUS};
use crate::models::{MatchOutcome, PlayerId, ScoreSheet, SetScore, Side, ValidationError};

/// Resolve a two-set score sheet reported by `side_a` against `side_b`.
///
/// 1. Both sets must be present and plausible; the first set must be finished.
/// 2. Each side's total is its games plus 2 per completed set won.
///    An unfinished second set adds games only.
/// 3. Higher total wins. Equal totals with one set each is a draw; otherwise
///    the first-set winner takes it.
///
/// Pure: identical input gives identical output.
pub fn resolve(
    sheet: &ScoreSheet,
    side_a: PlayerId,
    side_b: PlayerId,
) -> Result<MatchOutcome, ValidationError> {
    let set_1 = sheet.set_1.ok_or(ValidationError::MissingSet1)?;
    let set_2 = sheet.set_2.ok_or(ValidationError::MissingSet2)?;

    for (index, set) in [set_1, set_2].iter().enumerate() {
        if !is_valid_set_score(set.a, set.b) {
            return Err(ValidationError::InvalidSetScore(index));
        }
    }
    if !is_set_complete(set_1.a, set_1.b) {
        return Err(ValidationError::FirstSetIncomplete);
    }

    let first = if set_1.a > set_1.b { Side::A } else { Side::B };
    let second = set_winner(set_2);

    let total = |side: Side| -> u32 {
        let games = u32::from(set_1.games(side)) + u32::from(set_2.games(side));
        let sets_won = [Some(first), second]
            .iter()
            .filter(|w| **w == Some(side))
            .count() as u32;
        games + SET_BONUS * sets_won
    };
    let total_a = total(Side::A);
    let total_b = total(Side::B);

    let (winner_side, is_draw) = if total_a > total_b {
        (Side::A, false)
    } else if total_b > total_a {
        (Side::B, false)
    } else if second == Some(first.other()) {
        (Side::A, true)
    } else {
        (first, false)
    };

    let (winner_id, loser_id) = match winner_side {
        Side::A => (side_a, side_b),
        Side::B => (side_b, side_a),
    };

    Ok(MatchOutcome {
        winner_id,
        loser_id,
        winner_side,
        is_draw,
        score: score_string(&[set_1, set_2], winner_side),
        total_a,
        total_b,
    })
}

/// Sets separated by spaces, each led by `perspective`'s games.
pub fn score_string(sets: &[SetScore], perspective: Side) -> String {
    sets.iter()
        .map(|s| s.render_for(perspective))
        .collect::<Vec<_>>()
        .join(" ")
}
