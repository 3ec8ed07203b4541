//! Quiz content loaded from a TOML file at startup.
//!
//! ```toml
//! [[quizzes]]
//! id = "xmas"
//! name = "Christmas Quiz"
//!
//! [[quizzes.questions]]
//! sort_order = 10
//! question = "What colour is Rudolph's nose?"
//! answers = ["Blue", "Red", "Green", "Gold"]
//! correct_answer = 2
//! ```
//!
//! Seeding is insert-or-ignore: rows that already exist are left untouched,
//! so the file can be applied on every start.

use std::collections::HashSet;
use std::path::Path;

use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::entity::{question, quiz};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid seed data: {0}")]
    Invalid(String),

    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub quizzes: Vec<SeedQuiz>,
}

#[derive(Debug, Deserialize)]
pub struct SeedQuiz {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<SeedQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct SeedQuestion {
    pub sort_order: i32,
    pub question: String,
    pub answers: [String; 4],
    pub correct_answer: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Rows actually inserted by [`apply_seed`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub quizzes: u32,
    pub questions: u32,
}

/// Parse and validate seed TOML. Quiz ids are lowercased.
pub fn parse_seed(text: &str) -> Result<SeedFile, SeedError> {
    let mut seed: SeedFile = toml::from_str(text)?;

    let mut ids = HashSet::new();
    for q in &mut seed.quizzes {
        q.id = q.id.trim().to_lowercase();
        if q.id.is_empty() {
            return Err(SeedError::Invalid("quiz id must not be empty".into()));
        }
        if !ids.insert(q.id.clone()) {
            return Err(SeedError::Invalid(format!("duplicate quiz id '{}'", q.id)));
        }

        let mut positions = HashSet::new();
        for question in &q.questions {
            if !(1..=4).contains(&question.correct_answer) {
                return Err(SeedError::Invalid(format!(
                    "quiz '{}' question {}: correct_answer must be 1-4",
                    q.id, question.sort_order
                )));
            }
            if !positions.insert(question.sort_order) {
                return Err(SeedError::Invalid(format!(
                    "quiz '{}': duplicate sort_order {}",
                    q.id, question.sort_order
                )));
            }
        }
    }

    Ok(seed)
}

pub fn load_seed_file(path: impl AsRef<Path>) -> Result<SeedFile, SeedError> {
    let text = std::fs::read_to_string(path)?;
    parse_seed(&text)
}

/// Insert quizzes and questions that are not already present.
///
/// Relies on the `(quiz_id, sort_order)` unique key of [`question::Model`].
pub async fn apply_seed<C: ConnectionTrait>(db: &C, seed: &SeedFile) -> Result<SeedReport, DbErr> {
    let mut report = SeedReport::default();

    for q in &seed.quizzes {
        let model = quiz::ActiveModel {
            quiz_id: Set(q.id.clone()),
            name: Set(q.name.clone()),
        };

        let result = quiz::Entity::insert(model)
            .on_conflict(
                OnConflict::column(quiz::Column::QuizId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => report.quizzes += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }

        for item in &q.questions {
            let [a1, a2, a3, a4] = item.answers.clone();
            let model = question::ActiveModel {
                quiz_id: Set(q.id.clone()),
                sort_order: Set(item.sort_order),
                question: Set(item.question.clone()),
                answer_1: Set(a1),
                answer_2: Set(a2),
                answer_3: Set(a3),
                answer_4: Set(a4),
                correct_answer: Set(item.correct_answer),
                active: Set(item.active),
                ..Default::default()
            };

            let result = question::Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([question::Column::QuizId, question::Column::SortOrder])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await;

            match result {
                Ok(n) if n > 0 => report.questions += 1,
                Ok(_) | Err(DbErr::RecordNotInserted) => {}
                Err(e) => return Err(e),
            }
        }
    }

    if report.quizzes > 0 || report.questions > 0 {
        info!(
            "Seeded {} new quizzes and {} new questions",
            report.quizzes, report.questions
        );
    }

    Ok(report)
}
