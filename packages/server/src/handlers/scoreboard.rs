use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::contestant::CookieContestant;
use crate::models::play::{GroupScoreboardResponse, ScoreboardQuery};
use crate::quiz::Scoreboard;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{quiz_id}/groups/{group}/scoreboard",
    tag = "Scoreboard",
    operation_id = "groupScoreboard",
    summary = "Ranked scores for a group",
    description = "Most correct answers first, then fastest finish. Contestants still playing \
        rank after finished contestants with the same score.",
    params(
        ("quiz_id" = String, Path, description = "Quiz ID"),
        ("group" = String, Path, description = "Group label, case-insensitive"),
    ),
    responses(
        (status = 200, description = "Group ranking", body = GroupScoreboardResponse),
        (status = 404, description = "Quiz not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(quiz_id = %quiz_id, group = %group))]
pub async fn group_scoreboard(
    State(state): State<AppState>,
    Path((quiz_id, group)): Path<(String, String)>,
) -> Result<Json<GroupScoreboardResponse>, AppError> {
    let scores = state.leaderboard().rank(&quiz_id, &group).await?;
    Ok(Json(GroupScoreboardResponse {
        quiz_id: quiz_id.trim().to_lowercase(),
        group: group.trim().to_lowercase(),
        scores,
    }))
}

#[utoipa::path(
    get,
    path = "/scoreboard",
    tag = "Scoreboard",
    operation_id = "contestantScoreboard",
    summary = "Scoreboard for a contestant's group",
    description = "Resolves the contestant's quiz and group and returns the group ranking along \
        with the contestant's own row.",
    params(ScoreboardQuery),
    responses(
        (status = 200, description = "Contestant scoreboard", body = Scoreboard),
        (status = 400, description = "Missing or malformed contestant id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contestant not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip_all)]
pub async fn contestant_scoreboard(
    State(state): State<AppState>,
    cookie: CookieContestant,
    Query(query): Query<ScoreboardQuery>,
) -> Result<Json<Scoreboard>, AppError> {
    let contestant_id = cookie.resolve(query.c)?;
    let board = state.leaderboard().scoreboard_for(&contestant_id).await?;
    Ok(Json(board))
}
