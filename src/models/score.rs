//! Set scores as entered on the result form, and the resolved match outcome.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// One of the two participants in a reported match. A is the player reporting the result.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Games won by each side in one set.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub a: u8,
    pub b: u8,
}

impl SetScore {
    pub fn new(a: u8, b: u8) -> Self {
        Self { a, b }
    }

    /// Games won by `side`.
    pub fn games(&self, side: Side) -> u8 {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    /// `"<side's games>-<other side's games>"`.
    pub fn render_for(&self, side: Side) -> String {
        format!("{}-{}", self.games(side), self.games(side.other()))
    }
}

/// Raw form input: both sets are required but may be missing when submitted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    #[serde(default)]
    pub set_1: Option<SetScore>,
    #[serde(default)]
    pub set_2: Option<SetScore>,
}

impl ScoreSheet {
    pub fn new(set_1: SetScore, set_2: SetScore) -> Self {
        Self {
            set_1: Some(set_1),
            set_2: Some(set_2),
        }
    }
}

/// One set as typed into the result form: either half may be blank and any number may arrive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub a: Option<i64>,
    pub b: Option<i64>,
}

/// Result form as submitted. Converts to a [`ScoreSheet`] or the message to show the user.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreForm {
    #[serde(default)]
    pub set_1: Option<SetEntry>,
    #[serde(default)]
    pub set_2: Option<SetEntry>,
}

impl ScoreForm {
    /// A set with a blank half counts as missing. Numbers that cannot be game counts are
    /// invalid scores; the range rules themselves are left to the resolver.
    pub fn to_sheet(&self) -> Result<ScoreSheet, ValidationError> {
        let complete = |entry: Option<SetEntry>| entry.and_then(|e| Some((e.a?, e.b?)));
        let set_1 = complete(self.set_1).ok_or(ValidationError::MissingSet1)?;
        let set_2 = complete(self.set_2).ok_or(ValidationError::MissingSet2)?;
        let games = |(a, b): (i64, i64), index: usize| match (u8::try_from(a), u8::try_from(b)) {
            (Ok(a), Ok(b)) => Ok(SetScore::new(a, b)),
            _ => Err(ValidationError::InvalidSetScore(index)),
        };
        Ok(ScoreSheet::new(games(set_1, 0)?, games(set_2, 1)?))
    }
}

/// Result of resolving a score sheet, shown for confirmation before it is stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// For a draw this is side A's id; `is_draw` is what counts.
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub winner_side: Side,
    pub is_draw: bool,
    /// Both sets from the winner's perspective, e.g. `"6-4 6-3"`.
    pub score: String,
    /// Games plus completed-set bonus. Display only.
    pub total_a: u32,
    pub total_b: u32,
}

/// Reasons a score sheet is rejected. All are fixed by editing the form.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationError {
    MissingSet1,
    MissingSet2,
    /// 0 for the first set, 1 for the second.
    InvalidSetScore(usize),
    FirstSetIncomplete,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingSet1 => write!(f, "Enter the first set's score"),
            ValidationError::MissingSet2 => write!(f, "Enter the second set's score"),
            ValidationError::InvalidSetScore(0) => write!(f, "Invalid first set score"),
            ValidationError::InvalidSetScore(_) => write!(f, "Invalid second set score"),
            ValidationError::FirstSetIncomplete => write!(f, "The first set must be finished"),
        }
    }
}

impl std::error::Error for ValidationError {}
