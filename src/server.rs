//! Local proxy surface.
//!
//! Thin translators in front of a `BingoApi`: each endpoint makes at most one
//! outbound call and reshapes its result into JSON. Missing query parameters
//! are rejected before anything goes out. Query strings are read as raw pairs
//! so a repeated parameter takes its first value instead of failing
//! extraction.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{info, warn};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::core::{CardToken, GameCode};
use crate::protocol::{
    CardBody, CheckWinBody, CodeQuery, DashboardBody, ErrorBody, NewGameBody, QueryPairs,
    TokenQuery,
};
use crate::transport::{BingoApi, ServiceError};

#[derive(Clone)]
pub struct AppState {
    api: Arc<dyn BingoApi>,
}

impl AppState {
    pub fn new(api: Arc<dyn BingoApi>) -> Self {
        Self { api }
    }
}

/// Error reply rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::new(StatusCode::BAD_REQUEST, message)),
    }
}

fn required_code(pairs: &[(String, String)]) -> Result<GameCode, ApiError> {
    let raw = required(CodeQuery::from_pairs(pairs).bcode, "Missing game code")?;
    GameCode::new(&raw).map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Missing game code"))
}

/// `GET /checkwin?playcard_token=`. Transport failures read as not a winner.
pub async fn handle_checkwin(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<CheckWinBody>, ApiError> {
    let raw = required(
        TokenQuery::from_pairs(&pairs).playcard_token,
        "Missing playcard token",
    )?;
    let token = CardToken::new(&raw)
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Missing playcard token"))?;
    let won = match state.api.check_win(&token).await {
        Ok(won) => won,
        Err(e) => {
            warn!("[server] win check for {} failed: {}", token, e);
            false
        }
    };
    info!("[server] win check for {}: {}", token, won);
    Ok(Json(CheckWinBody::from_win(won)))
}

/// `GET /dashboard?bcode=`. Validates a code by probing for a card.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<DashboardBody>, ApiError> {
    let code = required_code(&pairs)?;
    match state.api.get_card(&code).await {
        Ok(Some(_)) => {
            info!("[server] game validated: {}", code);
            Ok(Json(DashboardBody {
                valid: true,
                bcode: code.to_string(),
            }))
        }
        Ok(None) => {
            info!("[server] invalid game code: {}", code);
            Err(ApiError::new(StatusCode::NOT_FOUND, "Invalid game code"))
        }
        Err(ServiceError::Status(status)) => {
            warn!("[server] dashboard validation failed, status: {}", status);
            Err(ApiError::new(StatusCode::NOT_FOUND, "Game not found"))
        }
        Err(e) => {
            warn!("[server] dashboard error: {}", e);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to validate game",
            ))
        }
    }
}

/// `GET /getcard?bcode=`. Answers the transposed card, or literal `0` when
/// there is no card or the service failed.
pub async fn handle_getcard(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Response, ApiError> {
    let code = required_code(&pairs)?;
    match state.api.get_card(&code).await {
        Ok(Some(card)) => {
            info!("[server] dealt card {} for {}", card.token(), code);
            Ok(Json(CardBody::from(&card)).into_response())
        }
        Ok(None) => {
            info!("[server] no card for {}", code);
            Ok(Json(0).into_response())
        }
        Err(e) => {
            warn!("[server] get card error: {}", e);
            Ok(Json(0).into_response())
        }
    }
}

/// `GET /newgame`.
pub async fn handle_newgame(State(state): State<AppState>) -> Result<Json<NewGameBody>, ApiError> {
    match state.api.new_game().await {
        Ok(game) => {
            info!("[server] new game code created: {}", game.code);
            Ok(Json(NewGameBody {
                bcode: game.code.to_string(),
                url: game.dashboard_url,
            }))
        }
        Err(ServiceError::Malformed(e)) => {
            warn!("[server] could not extract game code: {}", e);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not extract game code",
            ))
        }
        Err(e) => {
            warn!("[server] new game error: {}", e);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create new game",
            ))
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Proxy routes, served at the root and under `/api/bingo`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/checkwin", get(handle_checkwin))
        .route("/dashboard", get(handle_dashboard))
        .route("/getcard", get(handle_getcard))
        .route("/newgame", get(handle_newgame));

    Router::new()
        .route("/healthz", get(health))
        .merge(api.clone())
        .nest("/api/bingo", api)
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(Any),
        )
        .with_state(state)
}

/// Serve the proxy on an already bound listener until the task is dropped.
pub async fn serve_on(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    info!("[server] listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
