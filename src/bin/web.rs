//! Single binary web server: JSON API for the league, optional static frontend.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Env: HOST, PORT, RANKING_URL, RANKING_API_KEY, PROFILE_LOOKUP_TIMEOUT_MS, STATIC_DIR.

use actix_files::Files;
use actix_web::{
    delete,
    error::{InternalError, JsonPayloadError},
    get, post, put,
    web::{Data, Json, JsonConfig, Path, Query},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tennis_league_web::logic::{DEFAULT_INACTIVITY_DAYS, PROFILE_LOOKUP_TIMEOUT};
use tennis_league_web::{
    amend_outcome, export_matches_csv, preview, prune_expired_sessions, run_monthly_cycle,
    submit_outcome, AuthSession, Category, League, LogNotifier, MatchId, Player, PlayerId,
    PlayerRecord, RankingPeriod, RankingService, RpcRankingService, ScoreForm, ScoreSheet,
    SetEntry, StorageError, Trophy, ValidationError,
};
use uuid::Uuid;

/// In-memory league data.
type LeagueState = Data<RwLock<League>>;

/// Signed-in sessions by token. Sessions are handed out and refreshed here but no route
/// requires one yet; expired entries are swept by a background task.
type SessionState = Data<RwLock<HashMap<String, AuthSession>>>;

/// How long a session token is valid before it must be refreshed.
const SESSION_LIFETIME_SECS: i64 = 3600;

/// How often expired sessions are removed.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Collaborators configured at startup.
struct Services {
    ranking: Option<Arc<dyn RankingService>>,
    notifier: LogNotifier,
    lookup_timeout: Duration,
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Player plus derived match record (for API responses).
#[derive(Serialize)]
struct PlayerView<'a> {
    #[serde(flatten)]
    player: &'a Player,
    record: PlayerRecord,
}

#[derive(Deserialize)]
struct RegisterPlayerBody {
    name: String,
    email: String,
    #[serde(default)]
    category: Category,
}

#[derive(Deserialize)]
struct CategoryBody {
    category: Category,
}

#[derive(Deserialize)]
struct TrophyBody {
    title: String,
    season: String,
}

#[derive(Deserialize)]
struct PlayersQuery {
    category: Option<Category>,
}

/// A result as entered by the reporting player (side A).
#[derive(Deserialize)]
struct ReportBody {
    reporter_id: PlayerId,
    opponent_id: PlayerId,
    set_1: Option<SetEntry>,
    set_2: Option<SetEntry>,
    played_at: Option<NaiveDate>,
}

impl ReportBody {
    fn sheet(&self) -> Result<ScoreSheet, ValidationError> {
        ScoreForm {
            set_1: self.set_1,
            set_2: self.set_2,
        }
        .to_sheet()
    }

    fn played_at(&self) -> NaiveDate {
        self.played_at.unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[derive(Deserialize)]
struct MonthlyCycleBody {
    year: Option<i32>,
    month: Option<u32>,
    #[serde(default = "default_inactivity_days")]
    inactivity_days: u32,
}

fn default_inactivity_days() -> u32 {
    DEFAULT_INACTIVITY_DAYS
}

#[derive(Deserialize)]
struct SignInBody {
    email: String,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

/// Path segment: session token (e.g. /api/sessions/{token})
#[derive(Deserialize)]
struct SessionPath {
    token: String,
}

fn error_body(e: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": e.to_string() })
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Not-found errors are 404, everything else the caller got wrong is 400.
fn storage_error(e: StorageError) -> HttpResponse {
    if e.is_not_found() {
        HttpResponse::NotFound().json(error_body(e))
    } else {
        HttpResponse::BadRequest().json(error_body(e))
    }
}

/// Malformed JSON bodies get the same `{ "error": .. }` shape as every other 400.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(error_body(&err));
    InternalError::from_response(err, response).into()
}

/// Resolve the submitted form as reported by side A.
fn resolve_report(body: &ReportBody) -> Result<tennis_league_web::MatchOutcome, ValidationError> {
    preview(&body.sheet()?, body.reporter_id, body.opponent_id)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-league-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// List players. With `?category=` only approved players of that category, ladder order.
#[get("/api/players")]
async fn api_list_players(state: LeagueState, query: Query<PlayersQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let players: Vec<&Player> = match query.category {
        Some(category) => g.players_in(category),
        None => g.players.iter().collect(),
    };
    let views: Vec<PlayerView<'_>> = players
        .into_iter()
        .map(|p| PlayerView {
            player: p,
            record: g.record_for(p.id),
        })
        .collect();
    HttpResponse::Ok().json(views)
}

/// Register a player (pending until an admin approves).
#[post("/api/players")]
async fn api_register_player(state: LeagueState, body: Json<RegisterPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.register_player(&body.name, &body.email, body.category) {
        Ok(id) => {
            log::info!("Registration pending approval: {}", id);
            HttpResponse::Ok().json(g.player(id))
        }
        Err(e) => HttpResponse::BadRequest().json(error_body(e)),
    }
}

/// Reject a pending registration.
#[delete("/api/players/{id}")]
async fn api_remove_player(state: LeagueState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove_player(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => storage_error(e),
    }
}

/// Approve a registration (admin).
#[post("/api/players/{id}/approve")]
async fn api_approve_player(state: LeagueState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.approve_player(path.id) {
        Ok(()) => HttpResponse::Ok().json(g.player(path.id)),
        Err(e) => storage_error(e),
    }
}

/// Move a player to another category (admin).
#[put("/api/players/{id}/category")]
async fn api_set_category(
    state: LeagueState,
    path: Path<PlayerPath>,
    body: Json<CategoryBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.set_category(path.id, body.category) {
        Ok(()) => HttpResponse::Ok().json(g.player(path.id)),
        Err(e) => storage_error(e),
    }
}

/// Award a trophy (admin).
#[post("/api/players/{id}/trophies")]
async fn api_assign_trophy(
    state: LeagueState,
    path: Path<PlayerPath>,
    body: Json<TrophyBody>,
) -> HttpResponse {
    let title = body.title.trim();
    if title.is_empty() {
        return HttpResponse::BadRequest().json(error_body("Trophy title must not be empty"));
    }
    let trophy = Trophy {
        title: title.to_string(),
        season: body.season.trim().to_string(),
        awarded_at: Utc::now(),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.assign_trophy(path.id, trophy) {
        Ok(()) => HttpResponse::Ok().json(g.player(path.id)),
        Err(e) => storage_error(e),
    }
}

/// A player's matches, most recent first.
#[get("/api/players/{id}/matches")]
async fn api_player_matches(state: LeagueState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if g.player(path.id).is_none() {
        return HttpResponse::NotFound().json(error_body("Player not found"));
    }
    HttpResponse::Ok().json(g.matches_for(path.id))
}

/// Resolve a result for the confirmation step. Nothing is stored.
#[post("/api/matches/preview")]
async fn api_preview_match(body: Json<ReportBody>) -> HttpResponse {
    if body.reporter_id == body.opponent_id {
        return HttpResponse::BadRequest().json(error_body(StorageError::SamePlayer));
    }
    match resolve_report(&body) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => HttpResponse::BadRequest().json(error_body(e)),
    }
}

/// Confirmed result: resolve again, store, notify the opponent.
#[post("/api/matches")]
async fn api_report_match(
    state: LeagueState,
    services: Data<Services>,
    body: Json<ReportBody>,
) -> HttpResponse {
    let outcome = match resolve_report(&body) {
        Ok(o) => o,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match submit_outcome(&mut *g, &services.notifier, &outcome, body.played_at()) {
        Ok(id) => HttpResponse::Ok().json(g.match_record(id)),
        Err(e) => storage_error(e),
    }
}

/// Correct a stored match (admin). `reporter_id` is side A of the new score sheet.
#[put("/api/matches/{id}")]
async fn api_amend_match(
    state: LeagueState,
    path: Path<MatchPath>,
    body: Json<ReportBody>,
) -> HttpResponse {
    let outcome = match resolve_report(&body) {
        Ok(o) => o,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match amend_outcome(&mut *g, path.id, &outcome, body.played_at()) {
        Ok(()) => HttpResponse::Ok().json(g.match_record(path.id)),
        Err(e) => storage_error(e),
    }
}

#[get("/api/matches")]
async fn api_list_matches(state: LeagueState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(&g.matches)
}

#[get("/api/matches/export.csv")]
async fn api_export_matches(state: LeagueState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut buf = Vec::new();
    match export_matches_csv(&g, &mut buf) {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"matches.csv\""))
            .body(buf),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

/// Run the monthly ranking procedures (admin). Defaults to the current month.
#[post("/api/admin/monthly-cycle")]
async fn api_monthly_cycle(services: Data<Services>, body: Json<MonthlyCycleBody>) -> HttpResponse {
    let ranking = match &services.ranking {
        Some(r) => Arc::clone(r),
        None => {
            return HttpResponse::ServiceUnavailable()
                .json(error_body("Ranking service is not configured"))
        }
    };
    let today = Utc::now().date_naive();
    let current = RankingPeriod::of(today);
    let period = RankingPeriod {
        year: body.year.unwrap_or(current.year),
        month: body.month.unwrap_or(current.month),
    };
    if !(1..=12).contains(&period.month) {
        return HttpResponse::BadRequest().json(error_body("Month must be between 1 and 12"));
    }
    match run_monthly_cycle(ranking.as_ref(), period, today, body.inactivity_days).await {
        Ok(reports) => HttpResponse::Ok().json(reports),
        Err(e) => {
            log::error!("Monthly cycle failed: {}", e);
            HttpResponse::BadGateway().json(error_body(e))
        }
    }
}

/// Sign in: open a session and look up whether a player profile exists for the email.
/// The session's user id is the player's id when the email belongs to a registered player,
/// otherwise a fresh id for a user who has yet to register.
#[post("/api/sessions")]
async fn api_sign_in(
    league: LeagueState,
    sessions: SessionState,
    services: Data<Services>,
    body: Json<SignInBody>,
) -> HttpResponse {
    let email = body.email.trim().to_string();
    let existing: Result<Option<PlayerId>, &str> = league
        .read()
        .map(|g| g.player_by_email(&email).map(|p| p.id))
        .map_err(|_| "lock error");
    let user_id = existing
        .ok()
        .flatten()
        .unwrap_or_else(Uuid::new_v4);
    let lookup = async move { existing.map(|id| id.is_some()) };
    let session = AuthSession::init(
        Uuid::new_v4().to_string(),
        user_id,
        email,
        Utc::now() + ChronoDuration::seconds(SESSION_LIFETIME_SECS),
        lookup,
        services.lookup_timeout,
    )
    .await;
    let mut g = match sessions.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.insert(session.token.clone(), session.clone());
    HttpResponse::Ok().json(session)
}

/// Refresh a session token: old token is replaced.
#[put("/api/sessions/{token}")]
async fn api_refresh_session(sessions: SessionState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match sessions.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut session = match g.remove(&path.token) {
        Some(s) if s.is_active(Utc::now()) => s,
        _ => return HttpResponse::NotFound().json(error_body("No active session")),
    };
    session.refresh(
        Uuid::new_v4().to_string(),
        Utc::now() + ChronoDuration::seconds(SESSION_LIFETIME_SECS),
    );
    g.insert(session.token.clone(), session.clone());
    HttpResponse::Ok().json(session)
}

/// Sign out.
#[delete("/api/sessions/{token}")]
async fn api_sign_out(sessions: SessionState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match sessions.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove(&path.token) {
        Some(mut session) => {
            session.clear();
            HttpResponse::NoContent().finish()
        }
        None => HttpResponse::NotFound().json(error_body("No active session")),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);

    let ranking: Option<Arc<dyn RankingService>> = match std::env::var("RANKING_URL") {
        Ok(url) if !url.trim().is_empty() => {
            log::info!("Ranking service at {}", url);
            let api_key = std::env::var("RANKING_API_KEY").ok();
            Some(Arc::new(RpcRankingService::new(url, api_key)))
        }
        _ => {
            log::warn!("RANKING_URL not set; monthly recalculation is disabled");
            None
        }
    };
    let lookup_timeout = std::env::var("PROFILE_LOOKUP_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(PROFILE_LOOKUP_TIMEOUT);
    let static_dir = std::env::var("STATIC_DIR").ok();

    let league = Data::new(RwLock::new(League::new()));
    let sessions = Data::new(RwLock::new(HashMap::<String, AuthSession>::new()));
    let services = Data::new(Services {
        ranking,
        notifier: LogNotifier,
        lookup_timeout,
    });

    // Background task: drop sessions that expired without a refresh or sign-out
    let sessions_cleanup = sessions.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let mut g = match sessions_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let removed = prune_expired_sessions(&mut g, Utc::now());
            if removed > 0 {
                log::info!("Cleaned up {} expired session(s)", removed);
            }
        }
    });

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        let app = App::new()
            .app_data(league.clone())
            .app_data(sessions.clone())
            .app_data(services.clone())
            .app_data(JsonConfig::default().error_handler(json_error))
            .service(api_health)
            .service(favicon)
            .service(api_list_players)
            .service(api_register_player)
            .service(api_remove_player)
            .service(api_approve_player)
            .service(api_set_category)
            .service(api_assign_trophy)
            .service(api_player_matches)
            .service(api_preview_match)
            .service(api_export_matches)
            .service(api_report_match)
            .service(api_amend_match)
            .service(api_list_matches)
            .service(api_monthly_cycle)
            .service(api_sign_in)
            .service(api_refresh_session)
            .service(api_sign_out);
        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir.as_str()).index_file("index.html")),
            None => app,
        }
    })
    .bind(bind)?
    .run()
    .await
}
