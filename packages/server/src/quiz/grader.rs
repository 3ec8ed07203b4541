use std::sync::Arc;

use common::retry::retry_read;
use common::{AnswerOption, ContestantId, FeedbackConfig, ProgressError, RetryPolicy};
use rand::Rng;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{info, instrument};

use super::error::{QuizError, Result};
use super::progression::derive_progress;
use super::store::{self, counter};

/// Picks an index into a feedback pool.
pub trait LineChooser: Send + Sync {
    /// Return an index in `0..len`. `len` is never zero.
    fn choose(&self, len: usize) -> usize;
}

/// Uniformly random selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomChooser;

impl LineChooser for RandomChooser {
    fn choose(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Immutable feedback pools plus the chooser used to pick from them.
pub struct Feedback {
    lines: FeedbackConfig,
    chooser: Arc<dyn LineChooser>,
}

impl Feedback {
    pub fn new(lines: FeedbackConfig, chooser: Arc<dyn LineChooser>) -> Self {
        Self {
            lines: lines.normalized(),
            chooser,
        }
    }

    pub fn line(&self, correct: bool) -> &str {
        let pool = if correct {
            &self.lines.correct
        } else {
            &self.lines.incorrect
        };
        let idx = self.chooser.choose(pool.len()).min(pool.len() - 1);
        &pool[idx]
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new(FeedbackConfig::default(), Arc::new(RandomChooser))
    }
}

/// Result of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct GradeOutcome {
    pub question_number: u32,
    pub correct: bool,
    pub selected: u8,
    pub correct_answer: u8,
    pub message: String,
    pub total_questions: u32,
    /// True when this answer completed the quiz.
    pub finished: bool,
}

/// Checks answers against the stored question and updates the tally.
pub struct Grader<'a, C: ConnectionTrait> {
    conn: &'a C,
    retry: RetryPolicy,
    feedback: &'a Feedback,
}

impl<'a, C: ConnectionTrait> Grader<'a, C> {
    pub fn new(conn: &'a C, retry: RetryPolicy, feedback: &'a Feedback) -> Self {
        Self {
            conn,
            retry,
            feedback,
        }
    }

    /// Grade `selected` as the answer to question `question_number`.
    ///
    /// The quiz comes from the contestant's stored record, never the client.
    /// The question must be the contestant's next unanswered one. Grading
    /// the last active question stamps `finished`.
    #[instrument(skip_all, fields(contestant_id = %contestant_id, question = question_number))]
    pub async fn grade(
        &self,
        contestant_id: &ContestantId,
        question_number: u32,
        selected: &str,
    ) -> Result<GradeOutcome> {
        let selected: AnswerOption = selected.parse()?;

        let contestant = retry_read(&self.retry, "find_contestant", || {
            store::find_contestant(self.conn, contestant_id.as_str())
        })
        .await?
        .ok_or_else(|| QuizError::NotFound("Contestant".into()))?;

        let total = retry_read(&self.retry, "active_question_count", || {
            store::active_question_count(self.conn, &contestant.quiz_id)
        })
        .await?;

        let question = retry_read(&self.retry, "nth_active_question", || {
            store::nth_active_question(self.conn, &contestant.quiz_id, question_number)
        })
        .await?
        .ok_or_else(|| QuizError::NotFound(format!("Question {question_number}")))?;

        derive_progress(&contestant, total).check_answer(question_number)?;

        let correct = i32::from(selected.get()) == question.correct_answer;
        let answered_before = question_number - 1;

        if !store::record_answer(self.conn, contestant_id.as_str(), answered_before, correct).await? {
            // Another submission for this question got there first.
            let stored = retry_read(&self.retry, "find_contestant", || {
                store::find_contestant(self.conn, contestant_id.as_str())
            })
            .await?
            .map(|c| counter(c.questions_answered))
            .unwrap_or(answered_before);
            return Err(ProgressError::Stale {
                claimed: answered_before,
                stored,
            }
            .into());
        }

        let finished = question_number == total;
        if finished && store::stamp_finished(self.conn, contestant_id.as_str()).await? {
            info!(quiz_id = %contestant.quiz_id, "Contestant finished quiz");
        }

        Ok(GradeOutcome {
            question_number,
            correct,
            selected: selected.get(),
            correct_answer: u8::try_from(question.correct_answer).unwrap_or(0),
            message: self.feedback.line(correct).to_string(),
            total_questions: total,
            finished,
        })
    }
}
