//! HTTP routes for the drop token service.

use crate::games::drop_token::{Action, GameError, GameStatusView, MoveOutcome, QuitOutcome};
use crate::service::{GameService, ServiceError};
use axum::body::Body;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{info, instrument, warn};

/// Request body for creating a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Exactly two distinct player ids; the first moves first.
    pub players: Vec<String>,
    /// Number of columns.
    pub columns: usize,
    /// Number of rows; must equal `columns`.
    pub rows: usize,
}

/// Response body for a created game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    /// Identifier of the new game.
    #[serde(rename = "gameId")]
    pub game_id: String,
}

/// Request body for a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Column to drop into (1-indexed). Values below 1 are rejected by the
    /// game as an invalid column.
    pub column: i64,
}

/// Response body listing games.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameListResponse {
    /// All game identifiers.
    pub games: Vec<String>,
}

/// Response body listing a game's actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveListResponse {
    /// Every recorded action, oldest first.
    pub moves: Vec<Action>,
}

/// Builds the router over a shared [`GameService`].
#[instrument(skip(service))]
pub fn router(service: GameService) -> Router {
    info!("Building drop token router");
    Router::new()
        .route("/drop_token", get(list_games).post(create_game))
        .route("/drop_token/{game_id}", get(game_status))
        .route("/drop_token/{game_id}/moves", get(list_moves))
        .route("/drop_token/{game_id}/moves/{move_number}", get(get_move))
        .route(
            "/drop_token/{game_id}/{player_id}",
            axum::routing::post(post_move).delete(quit_game),
        )
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(service)
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

async fn list_games(
    State(service): State<GameService>,
) -> Result<Json<GameListResponse>, ServiceError> {
    let games = service.list_games()?;
    Ok(Json(GameListResponse { games }))
}

async fn create_game(
    State(service): State<GameService>,
    req: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<Json<CreateGameResponse>, ServiceError> {
    let Json(req) = req?;
    let [player_a, player_b]: [String; 2] = req.players.try_into().map_err(|players: Vec<String>| {
        ServiceError::InvalidRequest(format!(
            "exactly 2 players required, got {}",
            players.len()
        ))
    })?;
    if req.rows != req.columns {
        return Err(ServiceError::InvalidRequest(format!(
            "board must be square, got {}x{}",
            req.rows, req.columns
        )));
    }

    let game_id = service.create_game(req.columns, player_a, player_b)?;
    Ok(Json(CreateGameResponse { game_id }))
}

async fn game_status(
    State(service): State<GameService>,
    Path(game_id): Path<String>,
) -> Result<Json<GameStatusView>, ServiceError> {
    Ok(Json(service.status(&game_id)?))
}

async fn list_moves(
    State(service): State<GameService>,
    Path(game_id): Path<String>,
) -> Result<Json<MoveListResponse>, ServiceError> {
    let moves = service.moves(&game_id)?;
    Ok(Json(MoveListResponse { moves }))
}

async fn get_move(
    State(service): State<GameService>,
    path: Result<Path<(String, usize)>, PathRejection>,
) -> Result<Json<Action>, ServiceError> {
    let Path((game_id, move_number)) = path?;
    Ok(Json(service.move_at(&game_id, move_number)?))
}

async fn post_move(
    State(service): State<GameService>,
    Path((game_id, player_id)): Path<(String, String)>,
    req: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveOutcome>, ServiceError> {
    let Json(req) = req?;
    // Column 0 is never on the board, so the game reports it as invalid
    // after its turn checks.
    let column = usize::try_from(req.column).unwrap_or(0);
    Ok(Json(service.submit_move(&game_id, &player_id, column)?))
}

async fn quit_game(
    State(service): State<GameService>,
    Path((game_id, player_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<QuitOutcome>), ServiceError> {
    let outcome = service.quit(&game_id, &player_id)?;
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}

impl ServiceError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Game(e) => match e {
                GameError::UnknownPlayer(_) | GameError::IndexOutOfRange { .. } => {
                    StatusCode::NOT_FOUND
                }
                GameError::NotYourTurn { .. } => StatusCode::CONFLICT,
                GameError::GameNotQuittable => StatusCode::GONE,
                GameError::IllegalConfiguration(_)
                | GameError::GameOver
                | GameError::InvalidColumn { .. }
                | GameError::ColumnFull(_) => StatusCode::BAD_REQUEST,
            },
            ServiceError::Store(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!(status = %status, error = %self, "Request failed");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
