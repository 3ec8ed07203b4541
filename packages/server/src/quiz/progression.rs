use common::retry::retry_read;
use common::{ContestantId, QuizProgress, RetryPolicy};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::{QuizError, Result};
use super::store::{self, counter};
use crate::entity::{question, score};

/// One answer option as shown to the contestant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct AnswerChoice {
    pub number: u8,
    pub text: String,
}

/// A question as served to a contestant. The correct option is not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct QuestionView {
    /// 1-based position among the quiz's active questions.
    pub number: u32,
    pub text: String,
    pub answers: Vec<AnswerChoice>,
}

impl QuestionView {
    pub fn new(number: u32, q: &question::Model) -> Self {
        let answers = q
            .answers()
            .iter()
            .zip(1u8..)
            .map(|(text, number)| AnswerChoice {
                number,
                text: (*text).to_string(),
            })
            .collect();
        Self {
            number,
            text: q.question.clone(),
            answers,
        }
    }
}

/// What the contestant should see next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct NextQuestion {
    pub contestant_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub group: String,
    pub progress: QuizProgress,
    pub total_questions: u32,
    /// `None` once the quiz is finished.
    pub question: Option<QuestionView>,
}

/// Works out a contestant's position from stored counters on every call.
pub struct Progression<'a, C: ConnectionTrait> {
    conn: &'a C,
    retry: RetryPolicy,
}

impl<'a, C: ConnectionTrait> Progression<'a, C> {
    pub fn new(conn: &'a C, retry: RetryPolicy) -> Self {
        Self { conn, retry }
    }

    /// Resolve the next question for a contestant.
    ///
    /// `last_answered` is the client's view of the last question it answered
    /// (`None` on the first visit). It must agree with the stored counter or
    /// the request fails with a state mismatch. Entering question 1 stamps
    /// `started` exactly once.
    #[instrument(skip_all, fields(contestant_id = %contestant_id, last_answered = ?last_answered))]
    pub async fn next_question(
        &self,
        contestant_id: &ContestantId,
        last_answered: Option<u32>,
    ) -> Result<NextQuestion> {
        let mut contestant = self.load_contestant(contestant_id).await?;
        let quiz = retry_read(&self.retry, "find_quiz", || {
            store::find_quiz(self.conn, &contestant.quiz_id)
        })
        .await?
        .ok_or_else(|| QuizError::NotFound(format!("Quiz '{}'", contestant.quiz_id)))?;
        let total = retry_read(&self.retry, "active_question_count", || {
            store::active_question_count(self.conn, &quiz.quiz_id)
        })
        .await?;

        let answered = counter(contestant.questions_answered);
        QuizProgress::check_reported(last_answered, answered)?;

        let mut progress = derive_progress(&contestant, total);
        if progress == QuizProgress::Registered {
            if store::stamp_started(self.conn, contestant_id.as_str()).await? {
                info!(quiz_id = %quiz.quiz_id, "Contestant started quiz");
            }
            contestant.started = Some(chrono::Utc::now());
            progress = derive_progress(&contestant, total);
        }

        let question = match progress.next_question() {
            Some(number) => {
                let q = retry_read(&self.retry, "nth_active_question", || {
                    store::nth_active_question(self.conn, &quiz.quiz_id, number)
                })
                .await?
                .ok_or_else(|| QuizError::NotFound(format!("Question {number}")))?;
                Some(QuestionView::new(number, &q))
            }
            None => {
                self.repair_finished(&contestant, total).await?;
                None
            }
        };

        Ok(NextQuestion {
            contestant_id: contestant.contestant_id,
            quiz_id: quiz.quiz_id,
            quiz_title: quiz.name,
            group: contestant.group,
            progress,
            total_questions: total,
            question,
        })
    }

    /// Current state without side effects.
    pub async fn progress(&self, contestant_id: &ContestantId) -> Result<QuizProgress> {
        let contestant = self.load_contestant(contestant_id).await?;
        let total = retry_read(&self.retry, "active_question_count", || {
            store::active_question_count(self.conn, &contestant.quiz_id)
        })
        .await?;
        Ok(derive_progress(&contestant, total))
    }

    async fn load_contestant(&self, contestant_id: &ContestantId) -> Result<score::Model> {
        retry_read(&self.retry, "find_contestant", || {
            store::find_contestant(self.conn, contestant_id.as_str())
        })
        .await?
        .ok_or_else(|| QuizError::NotFound("Contestant".into()))
    }

    /// Stamp `finished` if the last answer was counted but the stamp was lost.
    async fn repair_finished(&self, contestant: &score::Model, total: u32) -> Result<()> {
        let answered = counter(contestant.questions_answered);
        if contestant.finished.is_none()
            && total > 0
            && answered >= total
            && store::stamp_finished(self.conn, &contestant.contestant_id).await?
        {
            warn!("Recovered missing finish time");
        }
        Ok(())
    }
}

pub fn derive_progress(contestant: &score::Model, total: u32) -> QuizProgress {
    QuizProgress::derive(
        contestant.started.is_some(),
        contestant.finished.is_some(),
        counter(contestant.questions_answered),
        total,
    )
}
