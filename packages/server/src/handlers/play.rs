use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::contestant::CookieContestant;
use crate::extractors::json::AppJson;
use crate::models::play::{AnswerRequest, NextQuestionRequest};
use crate::quiz::{GradeOutcome, NextQuestion};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/next",
    tag = "Play",
    operation_id = "nextQuestion",
    summary = "Get the next question",
    description = "Returns the contestant's next question, or a finished state with no question. \
        The first call starts the quiz clock. `last_answered` must match the number of answers \
        the server has recorded.",
    request_body = NextQuestionRequest,
    responses(
        (status = 200, description = "Next question or finished state", body = NextQuestion),
        (status = 400, description = "Missing or malformed contestant id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contestant or question not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Reported progress is stale (STATE_MISMATCH)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(last_answered = ?payload.last_answered))]
pub async fn next_question(
    State(state): State<AppState>,
    cookie: CookieContestant,
    AppJson(payload): AppJson<NextQuestionRequest>,
) -> Result<Json<NextQuestion>, AppError> {
    let contestant_id = cookie.resolve(payload.contestant_id)?;
    let next = state
        .progression()
        .next_question(&contestant_id, payload.last_answered)
        .await?;
    Ok(Json(next))
}

#[utoipa::path(
    post,
    path = "/answer",
    tag = "Play",
    operation_id = "submitAnswer",
    summary = "Answer the current question",
    description = "Grades the selected option (1-4) for the contestant's current question and \
        returns a feedback line. Answering the last question finishes the quiz.",
    request_body = AnswerRequest,
    responses(
        (status = 200, description = "Answer graded", body = GradeOutcome),
        (status = 400, description = "Answer is not 1-4 (INVALID_ANSWER_FORMAT) or bad request (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contestant or question not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Not the contestant's current question (STATE_MISMATCH)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(question = payload.question))]
pub async fn submit_answer(
    State(state): State<AppState>,
    cookie: CookieContestant,
    AppJson(payload): AppJson<AnswerRequest>,
) -> Result<Json<GradeOutcome>, AppError> {
    let contestant_id = cookie.resolve(payload.contestant_id)?;
    let outcome = state
        .grader()
        .grade(&contestant_id, payload.question, &payload.answer)
        .await?;
    Ok(Json(outcome))
}
