//! Signed-in user session, passed explicitly to whatever needs it.

use crate::logic::timeout::{with_timeout, Fallback};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

/// How long to wait for the player-profile lookup at sign-in.
pub const PROFILE_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Session of one signed-in user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AuthSession {
    /// Empty once cleared.
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    /// Whether the user already has a player profile (otherwise the UI offers registration).
    pub has_player: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Start a session and find out whether the user has a player profile.
    ///
    /// A slow or failing lookup must not lock a player out of their profile, so both are
    /// treated as "profile exists".
    pub async fn init<F, E>(
        token: impl Into<String>,
        user_id: Uuid,
        email: impl Into<String>,
        expires_at: DateTime<Utc>,
        lookup: F,
        lookup_timeout: Duration,
    ) -> Self
    where
        F: Future<Output = Result<bool, E>>,
        E: std::fmt::Display,
    {
        let has_player = match with_timeout(lookup, lookup_timeout, Fallback::Assume(Ok(true))).await {
            Ok(Ok(exists)) => exists,
            Ok(Err(e)) => {
                log::warn!("Profile lookup for {} failed, assuming it exists: {}", user_id, e);
                true
            }
            Err(_) => true,
        };
        Self {
            token: token.into(),
            user_id,
            email: email.into(),
            has_player,
            expires_at: Some(expires_at),
        }
    }

    /// Swap in a refreshed token.
    pub fn refresh(&mut self, token: impl Into<String>, expires_at: DateTime<Utc>) {
        self.token = token.into();
        self.expires_at = Some(expires_at);
    }

    /// Record that the user just registered a player profile.
    pub fn mark_has_player(&mut self) {
        self.has_player = true;
    }

    /// Sign out.
    pub fn clear(&mut self) {
        self.token.clear();
        self.has_player = false;
        self.expires_at = None;
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && self.expires_at.is_some_and(|t| t > now)
    }
}

/// Drop sessions that expired or were cleared. Returns how many were removed.
pub fn prune_expired_sessions(sessions: &mut HashMap<String, AuthSession>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| s.is_active(now));
    before - sessions.len()
}
