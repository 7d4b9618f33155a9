//! Tennis league web app: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    amend_outcome, export_matches_csv, is_set_complete, is_valid_set_score, preview,
    prune_expired_sessions, resolve, run_monthly_cycle, submit_outcome, with_timeout,
    AuthSession, Fallback, LogNotifier, MatchNotification, MatchStorage, Notifier, NotifyError,
    RankingError, RankingPeriod, RankingService, RpcRankingService,
};
pub use models::{
    Category, League, MatchId, MatchOutcome, MatchRecord, Player, PlayerId, PlayerRecord,
    ScoreForm, ScoreSheet, SetEntry, SetScore, Side, StorageError, Trophy, ValidationError,
};
