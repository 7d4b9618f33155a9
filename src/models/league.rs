//! League: registered players and stored matches.

use crate::models::match_record::{MatchId, MatchRecord};
use crate::models::player::{Category, Player, PlayerId, PlayerRecord, Trophy};
use serde::{Deserialize, Serialize};

/// Errors that can occur while changing league data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StorageError {
    /// Player not found among registered players.
    PlayerNotFound(PlayerId),
    /// Player is registered but not yet approved by an admin.
    PlayerNotApproved(PlayerId),
    /// Winner and loser are the same player.
    SamePlayer,
    MatchNotFound(MatchId),
    /// A player with this email already exists (case-insensitive).
    DuplicatePlayerEmail,
    InvalidName,
    InvalidEmail,
    /// Approved players cannot be approved again or withdrawn.
    AlreadyApproved(PlayerId),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::PlayerNotFound(_) => write!(f, "Player not found"),
            StorageError::PlayerNotApproved(_) => write!(f, "Player registration is not approved yet"),
            StorageError::SamePlayer => write!(f, "A player cannot play against themselves"),
            StorageError::MatchNotFound(_) => write!(f, "Match not found"),
            StorageError::DuplicatePlayerEmail => write!(f, "A player with this email already exists"),
            StorageError::InvalidName => write!(f, "Player name must not be empty"),
            StorageError::InvalidEmail => write!(f, "Invalid email address"),
            StorageError::AlreadyApproved(_) => write!(f, "Player is already approved"),
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    /// The referenced player or match does not exist (as opposed to a rejected change).
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::PlayerNotFound(_) | StorageError::MatchNotFound(_))
    }
}

/// All league data held by the server.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct League {
    pub players: Vec<Player>,
    /// Stored matches, in insertion order.
    pub matches: Vec<MatchRecord>,
}

impl League {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Registered player with this email (case-insensitive), approved or not.
    pub fn player_by_email(&self, email: &str) -> Option<&Player> {
        let email = email.trim();
        self.players.iter().find(|p| p.email.eq_ignore_ascii_case(email))
    }

    /// Look up a player that may take part in matches.
    pub fn approved_player(&self, id: PlayerId) -> Result<&Player, StorageError> {
        let p = self.player(id).ok_or(StorageError::PlayerNotFound(id))?;
        if !p.approved {
            return Err(StorageError::PlayerNotApproved(id));
        }
        Ok(p)
    }

    pub fn match_record(&self, id: MatchId) -> Option<&MatchRecord> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Register a new player. The registration stays pending until approved.
    pub fn register_player(
        &mut self,
        name: &str,
        email: &str,
        category: Category,
    ) -> Result<PlayerId, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidName);
        }
        let email = email.trim();
        if !looks_like_email(email) {
            return Err(StorageError::InvalidEmail);
        }
        if self.player_by_email(email).is_some() {
            return Err(StorageError::DuplicatePlayerEmail);
        }
        let player = Player::new(name, email, category);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Approve a pending registration (admin).
    pub fn approve_player(&mut self, id: PlayerId) -> Result<(), StorageError> {
        let p = self.player_mut(id).ok_or(StorageError::PlayerNotFound(id))?;
        if p.approved {
            return Err(StorageError::AlreadyApproved(id));
        }
        p.approve();
        Ok(())
    }

    /// Reject a pending registration. Approved players keep their match history and cannot be removed.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), StorageError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(StorageError::PlayerNotFound(id))?;
        if self.players[idx].approved {
            return Err(StorageError::AlreadyApproved(id));
        }
        self.players.remove(idx);
        Ok(())
    }

    /// Move a player to another category (admin).
    pub fn set_category(&mut self, id: PlayerId, category: Category) -> Result<(), StorageError> {
        self.player_mut(id)
            .ok_or(StorageError::PlayerNotFound(id))?
            .category = category;
        Ok(())
    }

    /// Award a trophy to an approved player (admin).
    pub fn assign_trophy(&mut self, id: PlayerId, trophy: Trophy) -> Result<(), StorageError> {
        self.approved_player(id)?;
        if let Some(p) = self.player_mut(id) {
            p.award(trophy);
        }
        Ok(())
    }

    /// Approved players of one category, best Pro Master score first, then by name.
    pub fn players_in(&self, category: Category) -> Vec<&Player> {
        let mut players: Vec<&Player> = self
            .players
            .iter()
            .filter(|p| p.approved && p.category == category)
            .collect();
        players.sort_by(|x, y| {
            y.pro_master_points
                .cmp(&x.pro_master_points)
                .then_with(|| x.name.cmp(&y.name))
        });
        players
    }

    /// Matches the player took part in, most recently played first.
    pub fn matches_for(&self, player: PlayerId) -> Vec<&MatchRecord> {
        let mut matches: Vec<&MatchRecord> =
            self.matches.iter().filter(|m| m.involves(player)).collect();
        matches.sort_by(|x, y| y.played_at.cmp(&x.played_at));
        matches
    }

    /// Wins, losses and draws over all stored matches.
    pub fn record_for(&self, player: PlayerId) -> PlayerRecord {
        let mut record = PlayerRecord::default();
        for m in self.matches.iter().filter(|m| m.involves(player)) {
            if m.is_draw {
                record.draws += 1;
            } else if m.winner_id == player {
                record.wins += 1;
            } else {
                record.losses += 1;
            }
        }
        record
    }
}

/// Minimal shape check; delivery problems surface in the mailer, not here.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
