//! HTTP surface: JSON API over one shared LeagueService, plus the single-page UI.
//!
//! Every request takes the service lock for its whole read / mutate / persist / notify
//! run, so actions are applied one at a time.

use crate::logic::NewInvitation;
use crate::models::{InvitationId, LeagueError, SetScore};
use crate::service::LeagueService;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    error::{InternalError, JsonPayloadError},
    get, post, put,
    web::{self, Data, Json, Path},
    HttpRequest, HttpResponse, Responder,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Shared application state: the single writer for all tables.
pub type AppState = Data<Mutex<LeagueService>>;

/// Session key holding the "I am" player selection.
const SESSION_PLAYER: &str = "player";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RecordMatchBody {
    winner: String,
    loser: String,
    /// Up to 5 `[winner_games, loser_games]` pairs; missing sets are 0-0.
    #[serde(default)]
    sets: Vec<[u8; 2]>,
}

#[derive(Deserialize)]
struct CreateInvitationBody {
    /// Falls back to the session player.
    created_by: Option<String>,
    match_date: NaiveDate,
    match_time: String,
    location: String,
}

#[derive(Deserialize, Default)]
struct ClaimBody {
    /// Falls back to the session player.
    claimer: Option<String>,
}

#[derive(Deserialize)]
struct SessionPlayerBody {
    player: String,
}

/// Path segment: invitation id (e.g. /api/invitations/{id}/claim)
#[derive(Deserialize)]
struct InvitationPath {
    id: InvitationId,
}

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn league_error_response(e: &LeagueError) -> HttpResponse {
    match e {
        LeagueError::InvalidMatchInput(_)
        | LeagueError::UnknownPlayer(_)
        | LeagueError::InvalidInvitation(_) => HttpResponse::BadRequest().json(error_body(e)),
        LeagueError::InvitationNotFound(_) => HttpResponse::NotFound().json(error_body(e)),
        LeagueError::InvitationAlreadyClaimed { .. } => HttpResponse::Conflict().json(error_body(e)),
        LeagueError::Persistence(_) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

/// Malformed or out-of-range JSON bodies get the same `{ "error": .. }` shape as the rest.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(error_body(&err));
    InternalError::from_response(err, response).into()
}

/// Explicit name from the request, else the session player.
fn acting_player(explicit: Option<String>, session: &Session) -> Option<String> {
    explicit
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| session.get::<String>(SESSION_PLAYER).ok().flatten())
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-ladder",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Roster names in standings order (for the select boxes).
#[get("/api/players")]
async fn api_players(state: AppState) -> HttpResponse {
    let league = state.lock().await;
    HttpResponse::Ok().json(league.players())
}

/// Current standings, ranked. Never mutates anything.
#[get("/api/standings")]
async fn api_standings(state: AppState) -> HttpResponse {
    let league = state.lock().await;
    HttpResponse::Ok().json(league.standings())
}

/// Match history with the formatted score column.
#[get("/api/history")]
async fn api_history(state: AppState) -> HttpResponse {
    let league = state.lock().await;
    HttpResponse::Ok().json(league.history())
}

/// Record a match result and return it with the updated standings.
#[post("/api/matches")]
async fn api_record_match(state: AppState, body: Json<RecordMatchBody>) -> HttpResponse {
    let mut league = state.lock().await;
    let sets: Vec<SetScore> = body.sets.iter().map(|[w, l]| SetScore::new(*w, *l)).collect();
    match league.record_match(body.winner.trim(), body.loser.trim(), &sets) {
        Ok(record) => HttpResponse::Ok().json(serde_json::json!({
            "match": record,
            "score": record.score(),
            "standings": league.standings(),
        })),
        Err(e) => league_error_response(&e),
    }
}

/// Open invitations, oldest first.
#[get("/api/invitations")]
async fn api_open_invitations(state: AppState) -> HttpResponse {
    let league = state.lock().await;
    HttpResponse::Ok().json(league.open_invitations())
}

/// Create an invitation and announce it to the league.
#[post("/api/invitations")]
async fn api_create_invitation(
    state: AppState,
    session: Session,
    body: Json<CreateInvitationBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let Some(created_by) = acting_player(body.created_by, &session) else {
        return HttpResponse::BadRequest().json(error_body("Select who is creating the invitation"));
    };
    let new = NewInvitation {
        created_by,
        match_date: body.match_date,
        match_time: body.match_time,
        location: body.location,
    };
    let mut league = state.lock().await;
    match league.create_invitation(new) {
        Ok((invitation, delivery)) => HttpResponse::Created().json(serde_json::json!({
            "invitation": invitation,
            "notification": delivery,
        })),
        Err(e) => league_error_response(&e),
    }
}

/// Accept an open invitation.
#[post("/api/invitations/{id}/claim")]
async fn api_claim_invitation(
    state: AppState,
    session: Session,
    path: Path<InvitationPath>,
    body: Option<Json<ClaimBody>>,
) -> HttpResponse {
    let body = body.map(Json::into_inner).unwrap_or_default();
    let Some(claimer) = acting_player(body.claimer, &session) else {
        return HttpResponse::BadRequest().json(error_body("Select who is accepting the invitation"));
    };
    let mut league = state.lock().await;
    match league.claim_invitation(path.id, &claimer) {
        Ok((invitation, delivery)) => HttpResponse::Ok().json(serde_json::json!({
            "invitation": invitation,
            "notification": delivery,
        })),
        Err(e) => league_error_response(&e),
    }
}

/// Who this browser session acts as, if chosen.
#[get("/api/session")]
async fn api_get_session(session: Session) -> HttpResponse {
    let player = session.get::<String>(SESSION_PLAYER).ok().flatten();
    HttpResponse::Ok().json(serde_json::json!({ "player": player }))
}

/// Choose the player this browser session acts as.
#[put("/api/session/player")]
async fn api_set_session_player(
    state: AppState,
    session: Session,
    body: Json<SessionPlayerBody>,
) -> HttpResponse {
    let player = body.player.trim();
    if !state.lock().await.league().has_player(player) {
        return league_error_response(&LeagueError::UnknownPlayer(player.to_string()));
    }
    match session.insert(SESSION_PLAYER, player) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "player": player })),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

/// Drop the working copy and read all tables from storage again.
#[post("/api/reload")]
async fn api_reload(state: AppState) -> HttpResponse {
    let mut league = state.lock().await;
    match league.reload() {
        Ok(()) => HttpResponse::Ok().json(league.standings()),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

async fn serve_index() -> HttpResponse {
    let html = include_str!("../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

/// Cookie session for the "I am" selection. Served over plain HTTP, so not `Secure`.
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

/// Register the page and all API routes. State and session middleware are added by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(serve_index))
        .service(api_health)
        .service(favicon)
        .service(api_players)
        .service(api_standings)
        .service(api_history)
        .service(api_record_match)
        .service(api_open_invitations)
        .service(api_create_invitation)
        .service(api_claim_invitation)
        .service(api_get_session)
        .service(api_set_session_player)
        .service(api_reload);
}
