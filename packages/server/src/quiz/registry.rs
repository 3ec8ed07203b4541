use chrono::Utc;
use common::ContestantId;
use common::RetryPolicy;
use common::retry::retry_read;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, SqlErr};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::error::{QuizError, Result};
use super::store;
use crate::entity::score;

pub const MAX_NAME_CHARS: usize = 64;
pub const MAX_GROUP_CHARS: usize = 64;

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Registration {
    pub contestant_id: String,
    /// True when an earlier registration that never answered anything was reused.
    pub resumed: bool,
}

/// `(quiz, group, name)` after trimming and case normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey {
    pub quiz_id: String,
    pub group: String,
    pub name: String,
}

impl NaturalKey {
    /// Quiz id and group are lowercased; the name keeps its case.
    pub fn new(quiz_id: &str, name: &str, group: &str) -> Result<Self> {
        let quiz_id = quiz_id.trim().to_lowercase();
        if quiz_id.is_empty() {
            return Err(QuizError::Validation("Quiz id must not be empty".into()));
        }

        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
            return Err(QuizError::Validation(format!(
                "Name must be 1-{MAX_NAME_CHARS} characters"
            )));
        }

        let group = group.trim().to_lowercase();
        if group.is_empty() || group.chars().count() > MAX_GROUP_CHARS {
            return Err(QuizError::Validation(format!(
                "Group must be 1-{MAX_GROUP_CHARS} characters"
            )));
        }

        Ok(Self {
            quiz_id,
            group,
            name: name.to_string(),
        })
    }

    pub fn contestant_id(&self) -> ContestantId {
        ContestantId::derive(&self.name, &self.quiz_id, &self.group)
    }
}

/// Create-or-reuse registration of contestants.
pub struct Registry<'a, C: ConnectionTrait> {
    conn: &'a C,
    retry: RetryPolicy,
}

impl<'a, C: ConnectionTrait> Registry<'a, C> {
    pub fn new(conn: &'a C, retry: RetryPolicy) -> Self {
        Self { conn, retry }
    }

    /// Register `name` for `quiz_id` in `group`.
    ///
    /// Idempotent until the contestant answers a question; after that the
    /// same triple is rejected with [`QuizError::AlreadyRegistered`].
    #[instrument(skip_all, fields(quiz_id = %quiz_id, group = %group))]
    pub async fn register(&self, quiz_id: &str, name: &str, group: &str) -> Result<Registration> {
        let key = NaturalKey::new(quiz_id, name, group)?;

        retry_read(&self.retry, "find_quiz", || {
            store::find_quiz(self.conn, &key.quiz_id)
        })
        .await?
        .ok_or_else(|| QuizError::NotFound(format!("Quiz '{}'", key.quiz_id)))?;

        if let Some(existing) = self.lookup(&key).await? {
            return resume_or_reject(existing, &key);
        }

        let contestant_id = key.contestant_id();
        let row = score::ActiveModel {
            contestant_id: Set(contestant_id.to_string()),
            quiz_id: Set(key.quiz_id.clone()),
            group: Set(key.group.clone()),
            name: Set(key.name.clone()),
            correct_answers: Set(0),
            questions_answered: Set(0),
            started: Set(None),
            finished: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match row.insert(self.conn).await {
            Ok(_) => {
                info!(contestant_id = %contestant_id, "Contestant registered");
                Ok(Registration {
                    contestant_id: contestant_id.into_string(),
                    resumed: false,
                })
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!("Registration race condition: unique constraint caught on insert");
                match self.lookup(&key).await? {
                    Some(existing) => resume_or_reject(existing, &key),
                    None => {
                        warn!(
                            contestant_id = %contestant_id,
                            "Contestant id already belongs to another registration"
                        );
                        Err(QuizError::AlreadyRegistered {
                            name: key.name.clone(),
                            group: key.group.clone(),
                        })
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn lookup(&self, key: &NaturalKey) -> Result<Option<score::Model>> {
        let found = retry_read(&self.retry, "find_by_natural_key", || {
            store::find_by_natural_key(self.conn, &key.quiz_id, &key.group, &key.name)
        })
        .await?;
        Ok(found)
    }
}

fn resume_or_reject(existing: score::Model, key: &NaturalKey) -> Result<Registration> {
    if existing.questions_answered == 0 {
        debug!(contestant_id = %existing.contestant_id, "Resuming unstarted registration");
        Ok(Registration {
            contestant_id: existing.contestant_id,
            resumed: true,
        })
    } else {
        Err(QuizError::AlreadyRegistered {
            name: key.name.clone(),
            group: key.group.clone(),
        })
    }
}
