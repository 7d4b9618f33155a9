//! League business logic: result resolution, reporting, storage, ranking calls.

mod export;
mod notify;
mod ranking;
mod reporting;
mod resolver;
mod scoring;
mod session;
mod storage;
mod timeout;

pub use export::export_matches_csv;
pub use notify::{LogNotifier, MatchNotification, Notifier, NotifyError};
pub use ranking::{
    run_monthly_cycle, CategorySwapParams, InactivityDemotionParams, MonthlyRankingParams,
    ProMasterPointsParams, ProcedureReport, RankingError, RankingPeriod, RankingService,
    RpcRankingService, DEFAULT_INACTIVITY_DAYS,
};
pub use reporting::{amend_outcome, preview, submit_outcome};
pub use resolver::{resolve, score_string};
pub use scoring::{is_set_complete, is_valid_set_score, set_winner, MAX_SET_GAMES, SET_BONUS};
pub use session::{prune_expired_sessions, AuthSession, PROFILE_LOOKUP_TIMEOUT};
pub use storage::MatchStorage;
pub use timeout::{with_timeout, Fallback, TimedOut};
