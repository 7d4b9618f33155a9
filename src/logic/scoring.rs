//! Per-set checks: plausibility and completion.

use crate::models::{SetScore, Side};

/// Most games either side can have in a set.
pub const MAX_SET_GAMES: u8 = 7;

/// Bonus points credited for each completed set a side won.
pub const SET_BONUS: u32 = 2;

/// Sanity check for one set score.
///
/// Rejects more than 7 games and a 7 reached from below 5. Anything else passes,
/// including unfinished sets like `4-3` and non-terminal ones like `6-5`.
pub fn is_valid_set_score(x: u8, y: u8) -> bool {
    if x > MAX_SET_GAMES || y > MAX_SET_GAMES {
        return false;
    }
    if (x == 7 && y < 5) || (y == 7 && x < 5) {
        return false;
    }
    true
}

/// A set is over at 6-0..6-4, 7-5 or 7-6, in either order.
pub fn is_set_complete(x: u8, y: u8) -> bool {
    let (high, low) = if x >= y { (x, y) } else { (y, x) };
    matches!((high, low), (6, 0..=4) | (7, 5) | (7, 6))
}

/// Side credited with the set, or `None` while the set is unfinished.
pub fn set_winner(set: SetScore) -> Option<Side> {
    if !is_set_complete(set.a, set.b) {
        return None;
    }
    if set.a > set.b {
        Some(Side::A)
    } else {
        Some(Side::B)
    }
}
