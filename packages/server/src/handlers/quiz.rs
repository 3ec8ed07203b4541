use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::contestant::contestant_cookie;
use crate::extractors::json::AppJson;
use crate::models::play::RegisterRequest;
use crate::quiz::{QuizSummary, Registration};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{quiz_id}",
    tag = "Quizzes",
    operation_id = "getQuiz",
    summary = "Get a quiz summary",
    description = "Returns the quiz title and the number of active questions. Quiz ids are case-insensitive.",
    params(("quiz_id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz summary", body = QuizSummary),
        (status = 404, description = "Quiz not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(quiz_id = %quiz_id))]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<Json<QuizSummary>, AppError> {
    let summary = state.catalog().quiz_summary(&quiz_id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/{quiz_id}/groups/{group}/contestants",
    tag = "Contestants",
    operation_id = "registerContestant",
    summary = "Register for a quiz",
    description = "Registers `name` in `group` for the quiz and sets the `contestant-id` cookie. \
        Registering the same name again before answering anything returns the existing id with \
        status 200. Once the contestant has answered a question the name is taken.",
    params(
        ("quiz_id" = String, Path, description = "Quiz ID"),
        ("group" = String, Path, description = "Group label, case-insensitive"),
    ),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Contestant registered", body = Registration),
        (status = 200, description = "Existing unstarted registration resumed", body = Registration),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Quiz not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already playing in this group (ALREADY_REGISTERED)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(quiz_id = %quiz_id, group = %group))]
pub async fn register_contestant(
    State(state): State<AppState>,
    Path((quiz_id, group)): Path<(String, String)>,
    jar: CookieJar,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state
        .registry()
        .register(&quiz_id, &payload.name, &group)
        .await?;

    let status = if registration.resumed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let jar = jar.add(contestant_cookie(&registration.contestant_id));

    Ok((status, jar, Json(registration)))
}
