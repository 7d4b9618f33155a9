//! League players, skill categories and trophies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Skill tier a player is ranked in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Gold,
    Silver,
    #[default]
    Bronze,
}

/// A trophy awarded by the league admin.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Trophy {
    pub title: String,
    /// Free-form season label, e.g. `"2026 spring"`.
    pub season: String,
    pub awarded_at: DateTime<Utc>,
}

/// Win/loss/draw counts derived from stored matches (for API / display).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl PlayerRecord {
    pub fn played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub email: String,
    pub category: Category,
    /// Registrations stay pending until an admin approves them.
    pub approved: bool,
    /// Pro Master ladder points; written back from the ranking service.
    pub pro_master_points: u32,
    pub trophies: Vec<Trophy>,
    pub registered_at: DateTime<Utc>,
}

impl Player {
    /// Create a pending player in the given category.
    pub fn new(name: impl Into<String>, email: impl Into<String>, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            category,
            approved: false,
            pro_master_points: 0,
            trophies: Vec::new(),
            registered_at: Utc::now(),
        }
    }

    pub fn approve(&mut self) {
        self.approved = true;
    }

    pub fn award(&mut self, trophy: Trophy) {
        self.trophies.push(trophy);
    }
}
