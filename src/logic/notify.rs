//! Opponent notification after a result is stored.

use crate::models::{MatchId, Player};
use chrono::NaiveDate;
use serde::Serialize;

/// Email content telling the opponent a result was reported against them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchNotification {
    pub match_id: MatchId,
    pub to_name: String,
    pub to_email: String,
    pub reporter_name: String,
    pub score: String,
    pub is_draw: bool,
    /// Whether the recipient won. Meaningless for a draw.
    pub recipient_won: bool,
    pub played_at: NaiveDate,
}

impl MatchNotification {
    pub fn subject(&self) -> String {
        format!("New match result reported by {}", self.reporter_name)
    }

    pub fn body(&self) -> String {
        let verdict = if self.is_draw {
            "a draw"
        } else if self.recipient_won {
            "a win for you"
        } else {
            "a loss for you"
        };
        format!(
            "Hi {},\n\n{} reported your match of {} as {} ({}).\nIf this is wrong, contact the league admin.\n",
            self.to_name, self.reporter_name, self.played_at, verdict, self.score
        )
    }

    pub(crate) fn for_opponent(
        match_id: MatchId,
        reporter: &Player,
        opponent: &Player,
        score: &str,
        is_draw: bool,
        opponent_won: bool,
        played_at: NaiveDate,
    ) -> Self {
        Self {
            match_id,
            to_name: opponent.name.clone(),
            to_email: opponent.email.clone(),
            reporter_name: reporter.name.clone(),
            score: score.to_string(),
            is_draw,
            recipient_won: opponent_won,
            played_at,
        }
    }
}

/// Why a notification could not be sent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotifyError(pub String);

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Notification failed: {}", self.0)
    }
}

impl std::error::Error for NotifyError {}

/// Sends notifications. Failures are reported but never undo the stored result.
pub trait Notifier {
    fn notify_opponent(&self, notification: &MatchNotification) -> Result<(), NotifyError>;
}

/// Writes outgoing emails to the log instead of delivering them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_opponent(&self, n: &MatchNotification) -> Result<(), NotifyError> {
        if n.to_email.is_empty() {
            return Err(NotifyError(format!("no email address for {}", n.to_name)));
        }
        log::info!("Email to {} <{}>: {}", n.to_name, n.to_email, n.subject());
        log::debug!("{}", n.body());
        Ok(())
    }
}
