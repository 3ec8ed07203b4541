use common::RetryPolicy;
use common::retry::retry_read;
use sea_orm::ConnectionTrait;
use serde::Serialize;

use super::error::{QuizError, Result};
use super::store;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct QuizSummary {
    #[schema(example = "xmas")]
    pub quiz_id: String,
    #[schema(example = "Christmas Quiz")]
    pub name: String,
    /// Number of active questions.
    pub total_questions: u32,
}

/// Read-only lookups of quiz metadata.
pub struct Catalog<'a, C: ConnectionTrait> {
    conn: &'a C,
    retry: RetryPolicy,
}

impl<'a, C: ConnectionTrait> Catalog<'a, C> {
    pub fn new(conn: &'a C, retry: RetryPolicy) -> Self {
        Self { conn, retry }
    }

    pub async fn quiz_summary(&self, quiz_id: &str) -> Result<QuizSummary> {
        let quiz_id = quiz_id.trim().to_lowercase();

        let quiz = retry_read(&self.retry, "find_quiz", || store::find_quiz(self.conn, &quiz_id))
            .await?
            .ok_or_else(|| QuizError::NotFound(format!("Quiz '{quiz_id}'")))?;

        let total_questions = retry_read(&self.retry, "active_question_count", || {
            store::active_question_count(self.conn, &quiz.quiz_id)
        })
        .await?;

        Ok(QuizSummary {
            quiz_id: quiz.quiz_id,
            name: quiz.name,
            total_questions,
        })
    }
}
