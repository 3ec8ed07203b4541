//! Queries and single-statement updates against the quiz tables.
//!
//! Every mutation here is one atomic statement. Nothing is wrapped in a
//! multi-statement transaction, so callers must tolerate a crash between
//! two of these calls.

use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entity::{question, quiz, score};

/// Convert a stored counter to `u32`. Counters never go negative.
pub fn counter(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

pub async fn find_quiz<C: ConnectionTrait>(
    db: &C,
    quiz_id: &str,
) -> Result<Option<quiz::Model>, DbErr> {
    quiz::Entity::find_by_id(quiz_id.to_owned()).one(db).await
}

/// Number of active questions in a quiz.
pub async fn active_question_count<C: ConnectionTrait>(db: &C, quiz_id: &str) -> Result<u32, DbErr> {
    let count = question::Entity::find()
        .filter(question::Column::QuizId.eq(quiz_id))
        .filter(question::Column::Active.eq(true))
        .count(db)
        .await?;
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// The `number`-th active question (1-based) by ascending sort order.
pub async fn nth_active_question<C: ConnectionTrait>(
    db: &C,
    quiz_id: &str,
    number: u32,
) -> Result<Option<question::Model>, DbErr> {
    if number == 0 {
        return Ok(None);
    }
    question::Entity::find()
        .filter(question::Column::QuizId.eq(quiz_id))
        .filter(question::Column::Active.eq(true))
        .order_by_asc(question::Column::SortOrder)
        .offset(Some(u64::from(number - 1)))
        .one(db)
        .await
}

pub async fn find_contestant<C: ConnectionTrait>(
    db: &C,
    contestant_id: &str,
) -> Result<Option<score::Model>, DbErr> {
    score::Entity::find()
        .filter(score::Column::ContestantId.eq(contestant_id))
        .one(db)
        .await
}

/// Look a contestant up by `(quiz, group, name)`. Expects normalized input.
pub async fn find_by_natural_key<C: ConnectionTrait>(
    db: &C,
    quiz_id: &str,
    group: &str,
    name: &str,
) -> Result<Option<score::Model>, DbErr> {
    score::Entity::find()
        .filter(score::Column::QuizId.eq(quiz_id))
        .filter(score::Column::Group.eq(group))
        .filter(score::Column::Name.eq(name))
        .one(db)
        .await
}

pub async fn group_scores<C: ConnectionTrait>(
    db: &C,
    quiz_id: &str,
    group: &str,
) -> Result<Vec<score::Model>, DbErr> {
    score::Entity::find()
        .filter(score::Column::QuizId.eq(quiz_id))
        .filter(score::Column::Group.eq(group))
        .order_by_desc(score::Column::CorrectAnswers)
        .all(db)
        .await
}

/// Stamp `started` unless it is already set. Returns whether this call set it.
pub async fn stamp_started<C: ConnectionTrait>(db: &C, contestant_id: &str) -> Result<bool, DbErr> {
    let result = score::Entity::update_many()
        .col_expr(score::Column::Started, Expr::value(Utc::now()))
        .filter(score::Column::ContestantId.eq(contestant_id))
        .filter(score::Column::Started.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Stamp `finished` unless it is already set. Returns whether this call set it.
pub async fn stamp_finished<C: ConnectionTrait>(
    db: &C,
    contestant_id: &str,
) -> Result<bool, DbErr> {
    let result = score::Entity::update_many()
        .col_expr(score::Column::Finished, Expr::value(Utc::now()))
        .filter(score::Column::ContestantId.eq(contestant_id))
        .filter(score::Column::Finished.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Count one graded answer.
///
/// Only applies while `questions_answered` still equals `answered_before`,
/// so a replayed or concurrent submission for the same question cannot be
/// counted twice. Returns whether the row was updated.
pub async fn record_answer<C: ConnectionTrait>(
    db: &C,
    contestant_id: &str,
    answered_before: u32,
    correct: bool,
) -> Result<bool, DbErr> {
    let answered_before = i32::try_from(answered_before)
        .map_err(|_| DbErr::Custom("questions_answered out of range".into()))?;

    let mut update = score::Entity::update_many()
        .col_expr(
            score::Column::QuestionsAnswered,
            Expr::col(score::Column::QuestionsAnswered).add(1),
        )
        .filter(score::Column::ContestantId.eq(contestant_id))
        .filter(score::Column::QuestionsAnswered.eq(answered_before))
        .filter(score::Column::Finished.is_null());

    if correct {
        update = update.col_expr(
            score::Column::CorrectAnswers,
            Expr::col(score::Column::CorrectAnswers).add(1),
        );
    }

    let result = update.exec(db).await?;
    Ok(result.rows_affected > 0)
}
