use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use common::retry::retry_read;
use common::{ContestantId, RetryPolicy};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::instrument;

use super::error::{QuizError, Result};
use super::store::{self, counter};
use crate::entity::score;

/// One ranked row of a group scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Score {
    /// 1-based rank within the group.
    pub position: u32,
    pub contestant_id: String,
    pub name: String,
    pub group: String,
    pub correct_answers: u32,
    pub questions_answered: u32,
    pub finished: bool,
    /// Seconds between start and finish; absent until finished.
    pub elapsed_seconds: Option<i64>,
    /// `elapsed_seconds` as `HH:MM:SS`.
    pub time_taken: Option<String>,
}

/// A contestant's own view of their group's scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Scoreboard {
    pub quiz_id: String,
    pub quiz_title: String,
    pub group: String,
    pub total_questions: u32,
    pub contestant: Score,
    pub scores: Vec<Score>,
}

/// Render seconds as zero-padded `HH:MM:SS`. Hours are not wrapped.
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Whole seconds from start to finish, `None` unless both are stamped.
pub fn elapsed_seconds(
    started: Option<DateTime<Utc>>,
    finished: Option<DateTime<Utc>>,
) -> Option<i64> {
    match (started, finished) {
        (Some(s), Some(f)) => Some((f - s).num_seconds().max(0)),
        _ => None,
    }
}

/// Order rows for display.
///
/// Most correct answers first. Equal scores go by elapsed time, fastest
/// first, and anyone without an elapsed time (not finished) goes after every
/// finished contestant on the same score. Remaining ties fall back to name.
pub fn rank_scores(rows: Vec<score::Model>) -> Vec<Score> {
    let mut rows: Vec<(score::Model, Option<i64>)> = rows
        .into_iter()
        .map(|row| {
            let elapsed = elapsed_seconds(row.started, row.finished);
            (row, elapsed)
        })
        .collect();

    rows.sort_by(|(a, a_elapsed), (b, b_elapsed)| {
        let key = |row: &score::Model, elapsed: &Option<i64>| {
            (
                Reverse(row.correct_answers),
                elapsed.is_none(),
                elapsed.unwrap_or(0),
            )
        };
        key(a, a_elapsed)
            .cmp(&key(b, b_elapsed))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.contestant_id.cmp(&b.contestant_id))
    });

    rows.into_iter()
        .zip(1u32..)
        .map(|((row, elapsed), position)| Score {
            position,
            finished: row.finished.is_some(),
            correct_answers: counter(row.correct_answers),
            questions_answered: counter(row.questions_answered),
            elapsed_seconds: elapsed,
            time_taken: elapsed.map(format_elapsed),
            contestant_id: row.contestant_id,
            name: row.name,
            group: row.group,
        })
        .collect()
}

/// Per-group rankings.
pub struct Leaderboard<'a, C: ConnectionTrait> {
    conn: &'a C,
    retry: RetryPolicy,
}

impl<'a, C: ConnectionTrait> Leaderboard<'a, C> {
    pub fn new(conn: &'a C, retry: RetryPolicy) -> Self {
        Self { conn, retry }
    }

    /// Rank every contestant of `group` in `quiz_id`.
    #[instrument(skip_all, fields(quiz_id = %quiz_id, group = %group))]
    pub async fn rank(&self, quiz_id: &str, group: &str) -> Result<Vec<Score>> {
        let quiz_id = quiz_id.trim().to_lowercase();
        let group = group.trim().to_lowercase();

        retry_read(&self.retry, "find_quiz", || store::find_quiz(self.conn, &quiz_id))
            .await?
            .ok_or_else(|| QuizError::NotFound(format!("Quiz '{quiz_id}'")))?;

        let rows = retry_read(&self.retry, "group_scores", || {
            store::group_scores(self.conn, &quiz_id, &group)
        })
        .await?;

        Ok(rank_scores(rows))
    }

    /// The scoreboard for a contestant's own quiz and group.
    #[instrument(skip_all, fields(contestant_id = %contestant_id))]
    pub async fn scoreboard_for(&self, contestant_id: &ContestantId) -> Result<Scoreboard> {
        let contestant = retry_read(&self.retry, "find_contestant", || {
            store::find_contestant(self.conn, contestant_id.as_str())
        })
        .await?
        .ok_or_else(|| QuizError::NotFound("Contestant".into()))?;

        let quiz = retry_read(&self.retry, "find_quiz", || {
            store::find_quiz(self.conn, &contestant.quiz_id)
        })
        .await?
        .ok_or_else(|| QuizError::NotFound(format!("Quiz '{}'", contestant.quiz_id)))?;

        let total_questions = retry_read(&self.retry, "active_question_count", || {
            store::active_question_count(self.conn, &quiz.quiz_id)
        })
        .await?;

        let rows = retry_read(&self.retry, "group_scores", || {
            store::group_scores(self.conn, &quiz.quiz_id, &contestant.group)
        })
        .await?;
        let scores = rank_scores(rows);

        let own = scores
            .iter()
            .find(|s| s.contestant_id == contestant.contestant_id)
            .cloned()
            .ok_or_else(|| QuizError::NotFound("Contestant".into()))?;

        Ok(Scoreboard {
            quiz_id: quiz.quiz_id,
            quiz_title: quiz.name,
            group: contestant.group,
            total_questions,
            contestant: own,
            scores,
        })
    }
}
